//! Error types and handling for toolflow core

use thiserror::Error;

/// Result type alias for toolflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for toolflow core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// LLM client errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool execution errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Retrieval backend errors
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Workflow construction errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Trace recording errors
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Prompt template compilation errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Prompt rendering errors
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

/// LLM client errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Unsupported protocol: {protocol}")]
    UnsupportedProtocol { protocol: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Empty response from model")]
    EmptyResponse,
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Tool execution failed: {name} - {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Tool panicked: {name}")]
    Panicked { name: String },
}

/// Retrieval backend errors
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Vector store lock poisoned")]
    LockPoisoned,

    #[error("Invalid splitter settings: chunk_overlap {overlap} must be smaller than chunk_size {size}")]
    InvalidSplitter { size: usize, overlap: usize },
}

/// Workflow construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Workflow not initialized: {reason}")]
    NotInitialized { reason: String },

    #[error("Blocking runtime unavailable: {message}")]
    Runtime { message: String },
}

/// Trace recording errors
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to record trace: {message}")]
    RecordingFailed { message: String },

    #[error("Failed to load trace: {path}")]
    LoadFailed { path: String },

    #[error("Invalid trace format")]
    InvalidFormat,
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
