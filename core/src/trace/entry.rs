//! Trace entry structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single event in a workflow trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// When the event happened
    pub timestamp: DateTime<Utc>,

    /// Invocation the event belongs to
    pub run_id: String,

    /// What happened
    pub event: TraceEvent,
}

/// Kinds of trace events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A query entered the workflow
    RunStarted { query: String },

    /// A stage wrote its field
    StageCompleted {
        stage: String,
        output: String,
        error: Option<String>,
    },

    /// The record was handed back to the caller
    RunCompleted {
        selected_tool: String,
        error: Option<String>,
        duration_ms: u64,
    },
}

impl TraceEntry {
    fn now(run_id: &str, event: TraceEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id: run_id.to_string(),
            event,
        }
    }

    pub fn run_started(run_id: &str, query: &str) -> Self {
        Self::now(
            run_id,
            TraceEvent::RunStarted {
                query: query.to_string(),
            },
        )
    }

    pub fn stage_completed(run_id: &str, stage: &str, output: &str, error: Option<&str>) -> Self {
        Self::now(
            run_id,
            TraceEvent::StageCompleted {
                stage: stage.to_string(),
                output: output.to_string(),
                error: error.map(str::to_string),
            },
        )
    }

    pub fn run_completed(
        run_id: &str,
        selected_tool: &str,
        error: Option<&str>,
        duration_ms: u64,
    ) -> Self {
        Self::now(
            run_id,
            TraceEvent::RunCompleted {
                selected_tool: selected_tool.to_string(),
                error: error.map(str::to_string),
                duration_ms,
            },
        )
    }
}
