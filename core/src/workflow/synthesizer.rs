//! Final response generation

use crate::llm::{ChatOptions, LlmClient};
use crate::workflow::prompt::{GroundingContext, PromptTemplate};
use std::sync::Arc;

/// Appended to the raw tool result whenever generation is unavailable
pub const DEGRADED_NOTICE: &str = "(LLM 응답 생성에 실패하여 도구 결과를 직접 제공합니다.)";

/// Output of the synthesis stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub final_response: String,
    /// Set only when no response could be produced at all
    pub error: Option<String>,
    /// Whether the raw tool result was returned instead of generated text
    pub degraded: bool,
}

impl Synthesis {
    fn generated(text: String) -> Self {
        Self {
            final_response: text,
            error: None,
            degraded: false,
        }
    }

    fn degraded(tool_result: &str) -> Self {
        Self {
            final_response: format!("도구 실행 결과: {}\n\n{}", tool_result, DEGRADED_NOTICE),
            error: None,
            degraded: true,
        }
    }
}

/// Turns a tool result into the user-facing answer
///
/// Without a client, or when the client call fails, the tool result is
/// returned with [`DEGRADED_NOTICE`]. Degraded mode is not an error.
pub struct ResponseSynthesizer {
    llm: Option<Arc<dyn LlmClient>>,
    template: PromptTemplate,
    options: ChatOptions,
}

impl ResponseSynthesizer {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, template: PromptTemplate, options: ChatOptions) -> Self {
        Self {
            llm,
            template,
            options,
        }
    }

    /// Whether every call will return the raw tool result
    pub fn is_degraded(&self) -> bool {
        self.llm.is_none()
    }

    pub async fn synthesize(&self, query: &str, tool: &str, tool_result: &str) -> Synthesis {
        let Some(llm) = &self.llm else {
            return Synthesis::degraded(tool_result);
        };

        let messages = match self.template.render(&GroundingContext {
            tool,
            result: tool_result,
            query,
        }) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to render grounding prompt: {}", e);
                return Synthesis {
                    final_response: format!("응답 생성 중 오류가 발생했습니다: {}", e),
                    error: Some(format!("응답 생성 오류: {}", e)),
                    degraded: false,
                };
            }
        };

        match llm.chat_completion(messages, Some(self.options.clone())).await {
            Ok(response) if !response.message.text().trim().is_empty() => {
                tracing::debug!(
                    "Generated response with {} ({})",
                    llm.model_name(),
                    llm.provider_name()
                );
                Synthesis::generated(response.message.content)
            }
            Ok(_) => {
                tracing::warn!("{} returned an empty response, using tool result", llm.provider_name());
                Synthesis::degraded(tool_result)
            }
            Err(e) => {
                tracing::warn!("LLM call failed, using tool result: {}", e);
                Synthesis::degraded(tool_result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::error::{LlmError, Result};
    use crate::llm::{LlmMessage, LlmResponse, MessageRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed text and keeps the last prompt
    struct ScriptedClient {
        reply: String,
        last_messages: Mutex<Vec<LlmMessage>>,
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn chat_completion(
            &self,
            messages: Vec<LlmMessage>,
            _options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            *self.last_messages.lock().unwrap() = messages;
            Ok(LlmResponse {
                message: LlmMessage::assistant(self.reply.clone()),
                usage: None,
                model: "scripted".to_string(),
                finish_reason: None,
            })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }

        fn provider_name(&self) -> &str {
            "test"
        }
    }

    struct DownClient;

    #[async_trait]
    impl LlmClient for DownClient {
        async fn chat_completion(
            &self,
            _messages: Vec<LlmMessage>,
            _options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            Err(LlmError::Network {
                message: "connection refused".to_string(),
            }
            .into())
        }

        fn model_name(&self) -> &str {
            "down"
        }

        fn provider_name(&self) -> &str {
            "test"
        }
    }

    fn template() -> PromptTemplate {
        PromptTemplate::from_config(&WorkflowConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_without_client_returns_tool_result() {
        let synthesizer = ResponseSynthesizer::new(None, template(), ChatOptions::default());
        assert!(synthesizer.is_degraded());

        let synthesis = synthesizer
            .synthesize("2 + 3", "calculator", "계산 결과: 2+3 = 5")
            .await;
        assert_eq!(
            synthesis.final_response,
            format!("도구 실행 결과: 계산 결과: 2+3 = 5\n\n{}", DEGRADED_NOTICE)
        );
        assert!(synthesis.degraded);
        assert_eq!(synthesis.error, None);
    }

    #[tokio::test]
    async fn test_client_failure_degrades() {
        let synthesizer = ResponseSynthesizer::new(
            Some(Arc::new(DownClient)),
            template(),
            ChatOptions::default(),
        );
        assert!(!synthesizer.is_degraded());

        let synthesis = synthesizer.synthesize("q", "rag_search", "passages").await;
        assert!(synthesis.degraded);
        assert!(synthesis.final_response.contains("passages"));
        assert!(synthesis.final_response.ends_with(DEGRADED_NOTICE));
        assert_eq!(synthesis.error, None);
    }

    #[tokio::test]
    async fn test_generated_answer_is_grounded() {
        let client = Arc::new(ScriptedClient {
            reply: "2 더하기 3은 5입니다.".to_string(),
            last_messages: Mutex::new(Vec::new()),
        });
        let synthesizer =
            ResponseSynthesizer::new(Some(client.clone()), template(), ChatOptions::default());

        let synthesis = synthesizer
            .synthesize("2 + 3 계산해줘", "calculator", "계산 결과: 2+3 = 5")
            .await;
        assert_eq!(synthesis.final_response, "2 더하기 3은 5입니다.");
        assert!(!synthesis.degraded);

        let prompt = client.last_messages.lock().unwrap().clone();
        assert_eq!(prompt[0].role, MessageRole::System);
        assert!(prompt[0].content.contains("사용된 도구: calculator"));
        assert!(prompt[0].content.contains("계산 결과: 2+3 = 5"));
        assert_eq!(prompt[1].content, "2 + 3 계산해줘");
    }

    #[tokio::test]
    async fn test_empty_answer_degrades() {
        let client = Arc::new(ScriptedClient {
            reply: "   ".to_string(),
            last_messages: Mutex::new(Vec::new()),
        });
        let synthesizer = ResponseSynthesizer::new(Some(client), template(), ChatOptions::default());

        let synthesis = synthesizer.synthesize("q", "calculator", "result").await;
        assert!(synthesis.degraded);
        assert!(synthesis.final_response.contains("result"));
    }
}
