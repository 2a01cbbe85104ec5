//! Recursive character text splitter
//!
//! Splits on the first separator present in the text (paragraphs, then lines,
//! then words, then characters), recursing into pieces that are still too
//! long, and merges small pieces back into chunks of at most `chunk_size`
//! characters with `chunk_overlap` characters carried over between chunks.

use crate::error::{RetrievalError, Result};
use crate::retrieval::Document;
use std::collections::VecDeque;

/// Default separators, coarsest first
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits long text into overlapping chunks
#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveTextSplitter {
    /// Create a splitter; the overlap must be smaller than the chunk size
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(RetrievalError::InvalidSplitter {
                size: chunk_size,
                overlap: chunk_overlap,
            }
            .into());
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Split text into chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Split text into documents tagged with `source` and sequential `chunk_id`s
    pub fn create_documents(&self, text: &str, source: &str, first_chunk_id: usize) -> Vec<Document> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                Document::new(chunk)
                    .with_metadata("source", serde_json::json!(source))
                    .with_metadata("chunk_id", serde_json::json!(first_chunk_id + i))
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = "";
        let mut remaining: &[String] = &[];

        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut small = Vec::new();

        for split in splits {
            if char_len(&split) < self.chunk_size {
                small.push(split);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge_splits(&small, separator));
                small.clear();
            }

            if remaining.is_empty() {
                chunks.push(split);
            } else {
                chunks.extend(self.split_recursive(&split, remaining));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge_splits(&small, separator));
        }

        chunks
    }

    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let len = char_len(split);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(chunk) = join_chunk(&current, separator) {
                        chunks.push(chunk);
                    }

                    // Keep a tail of the previous chunk as overlap
                    while !current.is_empty()
                        && (total > self.chunk_overlap
                            || (total + len + separator_len > self.chunk_size && total > 0))
                    {
                        let dropped = char_len(current[0])
                            + if current.len() > 1 { separator_len } else { 0 };
                        total = total.saturating_sub(dropped);
                        current.pop_front();
                    }
                }
            }

            current.push_back(split);
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = join_chunk(&current, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn join_chunk(parts: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
