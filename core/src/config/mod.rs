//! Configuration module for toolflow core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;
pub mod workflow;

pub use types::{ModelParams, Protocol, ResolvedLlmConfig};
pub use workflow::WorkflowConfig;
