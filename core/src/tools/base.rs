//! Base tool traits and structures

use crate::error::{Result, ToolError};
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Trait for all tools
///
/// A tool takes the raw user query and returns text. Expected domain
/// failures (no expression found, empty index) belong in the returned text;
/// `Err` is reserved for failures the tool cannot describe itself.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Run the tool on a query
    async fn run(&self, query: &str) -> Result<String>;

    /// Get examples of how to use this tool
    fn examples(&self) -> Vec<ToolExample> {
        Vec::new()
    }
}

/// Example usage of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExample {
    /// Description of what this example does
    pub description: String,

    /// Example query
    pub query: String,

    /// Expected result description
    pub expected_result: String,
}

impl ToolExample {
    pub fn new<S: Into<String>>(description: S, query: S, expected_result: S) -> Self {
        Self {
            description: description.into(),
            query: query.into(),
            expected_result: expected_result.into(),
        }
    }
}

/// Result of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the invoked tool
    pub tool_name: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Text handed to the synthesis stage
    pub content: String,

    /// Failure description, set when `success` is false
    pub error: Option<String>,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_name: S, content: S) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            content: content.into(),
            error: None,
            duration_ms: None,
        }
    }

    /// Create an error result; the message doubles as the content
    pub fn error<S: Into<String>>(tool_name: S, message: S) -> Self {
        let message = message.into();
        Self {
            tool_name: tool_name.into(),
            success: false,
            content: message.clone(),
            error: Some(message),
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Invokes registered tools by name
///
/// Never fails: unknown names and tool failures, panics included, come back
/// as error results.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    /// Create a new tool executor over a registry
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Registry the executor resolves names against
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke a tool by name with the user query
    pub async fn invoke(&self, tool_name: &str, query: &str) -> ToolResult {
        let Some(tool) = self.registry.get(tool_name) else {
            tracing::warn!("Unknown tool requested: {}", tool_name);
            return ToolResult::error(tool_name.to_string(), format!("알 수 없는 도구: {}", tool_name));
        };

        let start_time = Instant::now();
        let owned_query = query.to_string();
        // A separate task turns a panicking tool into a JoinError
        let outcome = tokio::spawn(async move { tool.run(&owned_query).await }).await;
        let duration = start_time.elapsed().as_millis() as u64;

        let failure = match outcome {
            Ok(Ok(content)) => {
                tracing::debug!("Tool {} finished in {}ms", tool_name, duration);
                return ToolResult::success(tool_name.to_string(), content).with_duration(duration);
            }
            Ok(Err(e)) => ToolError::ExecutionFailed {
                name: tool_name.to_string(),
                message: e.to_string(),
            },
            Err(join_error) if join_error.is_panic() => ToolError::Panicked {
                name: tool_name.to_string(),
            },
            Err(join_error) => ToolError::ExecutionFailed {
                name: tool_name.to_string(),
                message: join_error.to_string(),
            },
        };

        tracing::error!("Tool {} failed after {}ms: {}", tool_name, duration, failure);
        ToolResult::error(tool_name.to_string(), format!("도구 실행 오류: {}", failure))
            .with_duration(duration)
    }
}
