//! Workflow configuration structures

use serde::{Deserialize, Serialize};

/// Configuration for a workflow instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Custom system prompt template (optional)
    /// If not provided, the default grounding prompt will be used.
    /// May reference `{{tool}}`, `{{result}}` and `{{query}}`.
    pub system_prompt: Option<String>,

    /// Template for the user message
    pub user_prompt: String,

    /// Number of passages returned by the retrieval tool
    pub top_k: usize,

    /// Maximum chunk size, in characters, for uploaded documents
    pub chunk_size: usize,

    /// Characters shared between neighbouring chunks
    pub chunk_overlap: usize,

    /// Treat a generation client that fails to build as an initialization
    /// failure instead of falling back to degraded mode
    pub strict_generation: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            user_prompt: "{{query}}".to_string(),
            top_k: 3,
            chunk_size: 1000,
            chunk_overlap: 200,
            strict_generation: false,
        }
    }
}

impl WorkflowConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }

        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be smaller than chunk_size".to_string());
        }

        if self.user_prompt.trim().is_empty() {
            return Err("user_prompt cannot be empty".to_string());
        }

        Ok(())
    }
}
