//! Query workflow: route, execute, synthesize

pub mod builder;
pub mod core;
pub mod prompt;
pub mod record;
pub mod synthesizer;

pub use builder::WorkflowBuilder;
pub use self::core::{Stage, Workflow};
pub use prompt::{GroundingContext, PromptTemplate, DEFAULT_SYSTEM_PROMPT};
pub use record::{WorkflowRecord, NOT_INITIALIZED_MESSAGE};
pub use synthesizer::{ResponseSynthesizer, Synthesis, DEGRADED_NOTICE};
