//! Grounding prompt templates for response synthesis

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::llm::LlmMessage;
use handlebars::Handlebars;
use serde::Serialize;

/// Default system prompt; the tool name and tool result anchor the answer
pub const DEFAULT_SYSTEM_PROMPT: &str = "당신은 도움이 되는 AI 어시스턴트입니다. \n\
사용자의 질문에 대해 선택된 도구의 결과를 바탕으로 친절하고 정확한 답변을 제공하세요.\n\
\n\
사용된 도구: {{tool}}\n\
도구 실행 결과: {{result}}\n\
\n\
위 정보를 바탕으로 사용자의 질문에 답변해주세요.";

const SYSTEM_TEMPLATE: &str = "system";
const USER_TEMPLATE: &str = "user";

/// Fields interpolated into the prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct GroundingContext<'a> {
    pub tool: &'a str,
    pub result: &'a str,
    pub query: &'a str,
}

/// Compiled system and user templates
pub struct PromptTemplate {
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile a system and a user template
    pub fn new(system: &str, user: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        // Tool output is plain text, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(SYSTEM_TEMPLATE, system)?;
        registry.register_template_string(USER_TEMPLATE, user)?;

        Ok(Self { registry })
    }

    /// Compile the templates named by a workflow configuration
    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let system = config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        Self::new(system, &config.user_prompt)
    }

    /// Render the system and user messages for one generation request
    pub fn render(&self, context: &GroundingContext<'_>) -> Result<Vec<LlmMessage>> {
        let system = self.registry.render(SYSTEM_TEMPLATE, context)?;
        let user = self.registry.render(USER_TEMPLATE, context)?;

        Ok(vec![LlmMessage::system(system), LlmMessage::user(user)])
    }
}
