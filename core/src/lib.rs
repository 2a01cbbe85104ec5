//! # toolflow Core
//!
//! Core library for toolflow - a keyword-routed tool workflow.
//!
//! A query is routed to one tool by keyword, the tool runs on the query, and
//! the tool's output is turned into a final answer by a language model, or
//! returned as-is when no model is available.

// Core modules
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
pub mod router;
pub mod tools;
pub mod trace;
pub mod workflow;

// Re-export commonly used types
pub use config::{ModelParams, Protocol, ResolvedLlmConfig, WorkflowConfig};
pub use error::{Error, Result};
pub use retrieval::{Document, InMemoryVectorStore, VectorStore};
pub use router::Router;
pub use tools::{Tool, ToolRegistry};
pub use trace::TraceRecorder;
pub use workflow::{Workflow, WorkflowBuilder, WorkflowRecord};

/// Current version of the toolflow-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
