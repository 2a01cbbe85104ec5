//! Tool setup for the CLI

pub mod corpus;
pub mod registry;

pub use corpus::{seeded_store, SAMPLE_DOCUMENTS};
pub use registry::{create_cli_tool_registry, upload_documents};
