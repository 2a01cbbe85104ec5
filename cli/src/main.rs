//! # toolflow CLI
//!
//! Command-line interface for toolflow - a keyword-routed tool workflow.
//!
//! ## Usage
//!
//! - `toolflow` - Run the demo queries
//! - `toolflow "query"` - Run a single query
//! - `toolflow tools` - Show available tools
//! - `toolflow route "query"` - Show which tool would handle a query

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;
mod tools;

use commands::{route_command, run_command, tools_command, RunOptions, DEMO_QUERIES};
use config::CliConfigLoader;

/// toolflow - route queries to tools and synthesize answers
#[derive(Parser)]
#[command(name = "toolflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Route a query to a tool and answer from its result")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Protocol to use (openai, anthropic)
    #[arg(long)]
    protocol: Option<String>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Answer with raw tool results, never calling the LLM
    #[arg(long)]
    no_llm: bool,

    /// Output trace file
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Print workflow records as JSON
    #[arg(long)]
    json: bool,

    /// Add a text file to the document index before running (repeatable)
    #[arg(long = "document", value_name = "PATH")]
    documents: Vec<PathBuf>,

    /// The query to run (if omitted, runs the demo queries)
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools
    Tools,

    /// Show which tool would handle a query
    Route {
        /// Query to route
        query: String,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(protocol) = &cli.protocol {
        loader = loader.with_protocol_override(protocol.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable with --json
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config_loader = build_config_loader(&cli);

    let options = RunOptions {
        no_llm: cli.no_llm,
        trace_file: cli.trace_file,
        json: cli.json,
        documents: cli.documents,
    };

    match (cli.query, cli.command) {
        (Some(query), None) => run_command(vec![query], config_loader, options).await,
        (Some(_), Some(_)) => {
            tracing::error!("Error: Cannot specify both a query and a subcommand");
            std::process::exit(1);
        }
        (None, Some(Commands::Tools)) => tools_command(config_loader).await,
        (None, Some(Commands::Route { query })) => route_command(&query),
        (None, None) => {
            let queries = DEMO_QUERIES.iter().map(|q| q.to_string()).collect();
            run_command(queries, config_loader, options).await
        }
    }
}
