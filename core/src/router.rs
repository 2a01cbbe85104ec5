//! Keyword router mapping a query to a tool name
//!
//! Rules are evaluated in order against a lower-cased view of the query and
//! the first rule with a matching keyword wins. Matching is plain substring
//! search, so a `-` inside an unrelated word still selects the calculator.
//! Queries that match no rule go to the fallback tool.

use serde::{Deserialize, Serialize};

/// Tool name of the calculator
pub const CALCULATOR: &str = "calculator";
/// Tool name of the text statistics tool
pub const TEXT_PROCESSOR: &str = "text_processor";
/// Tool name of the retrieval tool
pub const RAG_SEARCH: &str = "rag_search";
/// Tool name of the document upload tool
pub const DOCUMENT_UPLOAD: &str = "document_upload";

/// One ordered routing category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule {
    /// Tool selected when a keyword matches
    pub tool: String,
    /// Substrings that select the tool
    pub keywords: Vec<String>,
}

impl RoutingRule {
    pub fn new<S: Into<String>>(tool: S, keywords: &[&str]) -> Self {
        Self {
            tool: tool.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Outcome of routing a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Selected tool name
    pub tool: String,
    /// Keyword that selected the tool, `None` for the fallback
    pub matched_keyword: Option<String>,
}

/// Static keyword router
#[derive(Debug, Clone)]
pub struct Router {
    rules: Vec<RoutingRule>,
    fallback: String,
}

impl Router {
    /// Create a router from ordered rules and a fallback tool
    ///
    /// Keywords are lower-cased here so routing only lower-cases the query.
    pub fn new<S: Into<String>>(rules: Vec<RoutingRule>, fallback: S) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| RoutingRule {
                tool: rule.tool,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Route a query to a tool name
    pub fn route(&self, query: &str) -> String {
        self.decide(query).tool
    }

    /// Route a query and report which keyword decided it
    pub fn decide(&self, query: &str) -> RouteDecision {
        let query_lower = query.to_lowercase();

        for rule in &self.rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| query_lower.contains(k.as_str())) {
                return RouteDecision {
                    tool: rule.tool.clone(),
                    matched_keyword: Some(keyword.clone()),
                };
            }
        }

        RouteDecision {
            tool: self.fallback.clone(),
            matched_keyword: None,
        }
    }

    /// Tool used when no rule matches
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Ordered routing rules
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(
            vec![
                RoutingRule::new(CALCULATOR, &["계산", "+", "-", "*", "/", "sqrt"]),
                RoutingRule::new(
                    TEXT_PROCESSOR,
                    &["단어", "문자", "대문자", "소문자", "텍스트", "분석"],
                ),
            ],
            RAG_SEARCH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_queries_route_to_calculator() {
        let router = Router::default();
        for query in [
            "2 + 3 * 4 계산해줘",
            "10 / 2",
            "SQRT(16)",
            "계산",
            // Incidental operator still wins over text keywords
            "텍스트 분석: well-known",
        ] {
            assert_eq!(router.route(query), CALCULATOR, "query: {}", query);
        }
    }

    #[test]
    fn test_text_queries_route_to_text_processor() {
        let router = Router::default();
        for query in ["Hello World 텍스트를 분석해줘", "단어 수 세기", "대문자로 바꿔줘"] {
            assert_eq!(router.route(query), TEXT_PROCESSOR, "query: {}", query);
        }
    }

    #[test]
    fn test_everything_else_falls_back_to_rag_search() {
        let router = Router::default();
        for query in ["", "인공지능에 대해 알려줘", "머신러닝이란 무엇인가요?", "LangGraph에 대해 설명해줘"] {
            assert_eq!(router.route(query), RAG_SEARCH, "query: {:?}", query);
        }
    }

    #[test]
    fn test_decision_reports_keyword() {
        let router = Router::default();
        let decision = router.decide("Sqrt of 16");
        assert_eq!(decision.tool, CALCULATOR);
        assert_eq!(decision.matched_keyword.as_deref(), Some("sqrt"));

        let decision = router.decide("hello");
        assert_eq!(decision.tool, RAG_SEARCH);
        assert_eq!(decision.matched_keyword, None);
    }

    #[test]
    fn test_rule_order_decides_overlap() {
        let router = Router::new(
            vec![
                RoutingRule::new("first", &["Shared"]),
                RoutingRule::new("second", &["shared"]),
            ],
            "fallback",
        );
        assert_eq!(router.route("SHARED words"), "first");
        assert_eq!(router.rules()[0].keywords, vec!["shared".to_string()]);
    }

    #[test]
    fn test_routing_is_stateless() {
        let router = Router::default();
        let first = router.decide("2 + 2");
        let second = router.decide("2 + 2");
        assert_eq!(first, second);
    }
}
