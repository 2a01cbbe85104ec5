//! Workflow run tracing and replay

pub mod entry;
pub mod recorder;

pub use entry::{TraceEntry, TraceEvent};
pub use recorder::{Trace, TraceMetadata, TraceRecorder};
