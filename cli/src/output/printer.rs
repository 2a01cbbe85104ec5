//! Terminal formatting

use colored::*;
use toolflow_core::router::RouteDecision;
use toolflow_core::{ToolRegistry, WorkflowRecord};

/// Print one workflow record as labelled sections
pub fn print_record(record: &WorkflowRecord) {
    println!("{} {}", "질문:".bold(), record.query);
    println!("{} {}", "선택된 도구:".cyan(), record.selected_tool);
    println!("{}\n{}", "도구 결과:".cyan(), record.tool_result);
    println!("{}\n{}", "최종 응답:".green(), record.final_response);
    if record.has_error() {
        println!("{} {}", "오류:".red(), record.error);
    }
}

/// List registered tools with the first line of their description
pub fn print_tools(registry: &ToolRegistry) {
    println!("{}\n", "Available Tools".bold());

    for name in registry.list_tools() {
        if let Some((tool_name, description)) = registry.get_tool_info(name) {
            println!("{}", tool_name.green());
            let first_line = description.lines().next().unwrap_or(description);
            println!("   {}\n", first_line);
        }
    }
}

/// Show which tool a query would be routed to, and why
pub fn print_route(query: &str, decision: &RouteDecision) {
    println!("{} {}", "Query:".bold(), query);
    match &decision.matched_keyword {
        Some(keyword) => println!(
            "{} {} (keyword {:?})",
            "Tool:".green(),
            decision.tool,
            keyword
        ),
        None => println!("{} {} (fallback)", "Tool:".yellow(), decision.tool),
    }
}
