//! Built-in tools

pub mod calculator;
pub mod rag;
pub mod text_processor;

pub use calculator::CalculatorTool;
pub use rag::{DocumentUploadTool, RagSearchTool};
pub use text_processor::TextProcessorTool;
