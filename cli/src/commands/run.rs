//! Query execution command

use crate::config::CliConfigLoader;
use crate::output::print_record;
use crate::tools::{create_cli_tool_registry, upload_documents};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use toolflow_core::{TraceRecorder, WorkflowBuilder};
use tracing::{info, warn};

/// Queries run when none is given on the command line
pub const DEMO_QUERIES: [&str; 5] = [
    "2 + 3 * 4 계산해줘",
    "Hello World 텍스트를 분석해줘",
    "인공지능에 대해 알려줘",
    "머신러닝이란 무엇인가요?",
    "LangGraph에 대해 설명해줘",
];

/// Options shared by single-query and demo runs
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Never call the LLM, even when credentials are configured
    pub no_llm: bool,
    /// Save a trace of every run to this file
    pub trace_file: Option<PathBuf>,
    /// Print records as JSON
    pub json: bool,
    /// Files added to the document index before running
    pub documents: Vec<PathBuf>,
}

/// Run queries through the workflow and print their records
pub async fn run_command(
    queries: Vec<String>,
    config_loader: CliConfigLoader,
    options: RunOptions,
) -> Result<()> {
    let config = config_loader.load().await?;

    let registry = create_cli_tool_registry(&config.workflow)?;
    if !options.documents.is_empty() {
        upload_documents(&registry, &options.documents).await?;
    }

    let mut builder = WorkflowBuilder::new(registry).with_config(config.workflow.clone());

    match &config.llm {
        Some(llm_config) if !options.no_llm => {
            info!("🤖 Using protocol: {}", llm_config.protocol.as_str());
            info!("🤖 Using model: {}", llm_config.model);
            builder = builder.with_llm_config(llm_config.clone());
        }
        _ => info!("Running without LLM, answers are raw tool results"),
    }

    if let Some(trace_file) = &options.trace_file {
        info!("📊 Trace file: {}", trace_file.display());
        builder = builder.with_trace_recorder(Arc::new(TraceRecorder::with_file(trace_file)));
    }

    let workflow = builder.build();
    if let Some(error) = workflow.init_error() {
        warn!("{}", error);
    }

    let mut records = Vec::with_capacity(queries.len());
    for query in &queries {
        info!("Executing query: {}", query);
        records.push(workflow.arun(query).await);
    }

    if options.json {
        let json = match records.as_slice() {
            [record] => serde_json::to_string_pretty(record)?,
            records => serde_json::to_string_pretty(records)?,
        };
        println!("{}", json);
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!("\n{}\n", "-".repeat(50));
        }
        print_record(record);
    }

    Ok(())
}
