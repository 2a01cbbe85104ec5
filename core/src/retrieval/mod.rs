//! Document retrieval backing the search and upload tools

pub mod document;
pub mod memory;
pub mod splitter;

pub use document::Document;
pub use memory::InMemoryVectorStore;
pub use splitter::RecursiveTextSplitter;

use crate::error::Result;

/// Storage that answers nearest-passage queries
///
/// Implementations must be safe to call from several workflow invocations at
/// once.
pub trait VectorStore: Send + Sync {
    /// Index documents, returning how many were added
    fn add_documents(&self, documents: Vec<Document>) -> Result<usize>;

    /// Return up to `k` documents most similar to the query, best first
    fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;

    /// Number of indexed documents
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
