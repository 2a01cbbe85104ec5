//! Workflow construction

use crate::config::{ModelParams, ResolvedLlmConfig, WorkflowConfig};
use crate::error::{ConfigError, Error, Result, WorkflowError};
use crate::llm::{create_client, ChatOptions, LlmClient};
use crate::router::Router;
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::trace::TraceRecorder;
use crate::workflow::core::WorkflowCore;
use crate::workflow::{PromptTemplate, ResponseSynthesizer, Workflow};
use std::sync::Arc;

enum LlmSource {
    None,
    Config(ResolvedLlmConfig),
    Client(Arc<dyn LlmClient>),
}

/// Builder for creating workflows
///
/// `build` never fails. An unusable configuration produces a workflow that
/// answers every query with an initialization error record, and a generation
/// client that cannot be created leaves the workflow in degraded mode unless
/// `strict_generation` is set.
pub struct WorkflowBuilder {
    registry: ToolRegistry,
    router: Router,
    config: WorkflowConfig,
    llm: LlmSource,
    trace: Option<Arc<TraceRecorder>>,
}

impl WorkflowBuilder {
    /// Create a builder over a tool registry with the default router
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            router: Router::default(),
            config: WorkflowConfig::default(),
            llm: LlmSource::None,
            trace: None,
        }
    }

    /// Set the router
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Set workflow configuration
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the generation client from resolved configuration
    pub fn with_llm_config(mut self, llm_config: ResolvedLlmConfig) -> Self {
        self.llm = LlmSource::Config(llm_config);
        self
    }

    /// Use an existing generation client
    pub fn with_llm_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.llm = LlmSource::Client(client);
        self
    }

    /// Record every run into a trace
    pub fn with_trace_recorder(mut self, recorder: Arc<TraceRecorder>) -> Self {
        self.trace = Some(recorder);
        self
    }

    /// Build the workflow
    pub fn build(self) -> Workflow {
        match self.try_build() {
            Ok(core) => Workflow::ready(core),
            Err(e) => {
                tracing::error!("Workflow initialization failed: {}", e);
                Workflow::failed(WorkflowError::NotInitialized {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn try_build(self) -> Result<WorkflowCore> {
        self.config.validate().map_err(|message| ConfigError::InvalidValue {
            field: "workflow".to_string(),
            value: message,
        })?;

        let template = PromptTemplate::from_config(&self.config)?;

        let (llm, options) = match self.llm {
            LlmSource::None => {
                tracing::info!("No LLM configured, responses will contain raw tool results");
                (None, ChatOptions::from(&ModelParams::default()))
            }
            LlmSource::Client(client) => (Some(client), ChatOptions::from(&ModelParams::default())),
            LlmSource::Config(llm_config) => {
                let options = ChatOptions::from(&llm_config.params);
                match Self::create_llm(&llm_config) {
                    Ok(client) => (Some(client), options),
                    Err(e) if self.config.strict_generation => return Err(e),
                    Err(e) => {
                        tracing::warn!("LLM unavailable, running in degraded mode: {}", e);
                        (None, options)
                    }
                }
            }
        };

        for rule in self.router.rules() {
            if !self.registry.contains(&rule.tool) {
                tracing::warn!("Routing rule targets unregistered tool {}", rule.tool);
            }
        }
        if !self.registry.contains(self.router.fallback()) {
            tracing::warn!("Fallback tool {} is not registered", self.router.fallback());
        }

        Ok(WorkflowCore {
            router: self.router,
            executor: ToolExecutor::new(Arc::new(self.registry)),
            synthesizer: ResponseSynthesizer::new(llm, template, options),
            trace: self.trace,
        })
    }

    fn create_llm(llm_config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
        llm_config.validate().map_err(|message| {
            Error::from(ConfigError::InvalidValue {
                field: "llm".to_string(),
                value: message,
            })
        })?;
        create_client(llm_config)
    }
}
