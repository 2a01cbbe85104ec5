//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{Tool, ToolExample, ToolExecutor, ToolResult};
pub use registry::ToolRegistry;
