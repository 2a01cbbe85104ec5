//! The record threaded through the workflow stages

use serde::{Deserialize, Serialize};

/// State shared by the workflow stages
///
/// Each stage writes only its own field. A failing stage still writes a
/// diagnostic string into that field, so later stages always have text to
/// consume, and puts the failure in `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    /// The original input
    pub query: String,

    /// Tool chosen by the router
    pub selected_tool: String,

    /// Text produced by the tool
    pub tool_result: String,

    /// Final answer shown to the user
    pub final_response: String,

    /// Latest stage failure, empty when nothing went wrong
    pub error: String,
}

impl WorkflowRecord {
    /// Create a fresh record for one invocation
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Record returned when the workflow could not be built
    pub fn uninitialized<S: Into<String>>(query: S, reason: &str) -> Self {
        Self {
            query: query.into(),
            final_response: format!("{} ({})", NOT_INITIALIZED_MESSAGE, reason),
            error: NOT_INITIALIZED_MESSAGE.to_string(),
            ..Default::default()
        }
    }

    /// Record returned when the workflow machinery itself failed
    pub fn execution_failure<S: Into<String>>(query: S, reason: &str) -> Self {
        let message = format!("Agent 실행 오류: {}", reason);
        Self {
            query: query.into(),
            final_response: message.clone(),
            error: message,
            ..Default::default()
        }
    }

    /// Whether any stage reported a failure
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Fixed error text of an uninitialized workflow
pub const NOT_INITIALIZED_MESSAGE: &str = "Agent가 초기화되지 않았습니다.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty_except_query() {
        let record = WorkflowRecord::new("질문");
        assert_eq!(record.query, "질문");
        assert!(record.selected_tool.is_empty());
        assert!(record.tool_result.is_empty());
        assert!(record.final_response.is_empty());
        assert!(!record.has_error());
    }

    #[test]
    fn test_uninitialized_record() {
        let record = WorkflowRecord::uninitialized("q", "template error");
        assert_eq!(record.error, NOT_INITIALIZED_MESSAGE);
        assert!(record.final_response.contains("template error"));
        assert!(record.selected_tool.is_empty());
        assert!(record.has_error());
    }

    #[test]
    fn test_execution_failure_record() {
        let record = WorkflowRecord::execution_failure("q", "thread panicked");
        assert_eq!(record.error, "Agent 실행 오류: thread panicked");
        assert_eq!(record.final_response, record.error);
    }

    #[test]
    fn test_serializes_all_fields() {
        let json = serde_json::to_value(WorkflowRecord::new("q")).unwrap();
        for field in ["query", "selected_tool", "tool_result", "final_response", "error"] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
    }
}
