//! In-process vector store over sparse lexical embeddings

use crate::error::{RetrievalError, Result};
use crate::retrieval::{Document, VectorStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// Weight of a character bigram relative to a whole token
const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone, Default)]
struct SparseVector {
    weights: HashMap<String, f32>,
    norm: f32,
}

impl SparseVector {
    /// Lower-cased alphanumeric tokens plus their character bigrams, which
    /// lets Korean stems match across particles ("머신러닝이란" vs "머신러닝은").
    fn embed(text: &str) -> Self {
        let mut weights: HashMap<String, f32> = HashMap::new();

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let chars: Vec<char> = token.chars().collect();
            for pair in chars.windows(2) {
                let key = format!("#{}{}", pair[0], pair[1]);
                *weights.entry(key).or_default() += BIGRAM_WEIGHT;
            }
            *weights.entry(token).or_default() += 1.0;
        }

        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        Self { weights, norm }
    }

    fn cosine(&self, other: &SparseVector) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }

        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };

        let dot: f32 = small
            .weights
            .iter()
            .filter_map(|(key, w)| large.weights.get(key).map(|v| w * v))
            .sum();

        dot / (self.norm * other.norm)
    }
}

#[derive(Debug)]
struct IndexedDocument {
    document: Document,
    embedding: SparseVector,
}

/// Vector store held entirely in memory
///
/// Safe to share between threads: searches take a read lock, inserts a write
/// lock.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<IndexedDocument>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn add_documents(&self, documents: Vec<Document>) -> Result<usize> {
        let indexed: Vec<IndexedDocument> = documents
            .into_iter()
            .map(|document| IndexedDocument {
                embedding: SparseVector::embed(&document.page_content),
                document,
            })
            .collect();
        let added = indexed.len();

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RetrievalError::LockPoisoned)?;
        entries.extend(indexed);

        tracing::debug!("Indexed {} documents ({} total)", added, entries.len());
        Ok(added)
    }

    fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = SparseVector::embed(query);
        let entries = self
            .entries
            .read()
            .map_err(|_| RetrievalError::LockPoisoned)?;

        let mut scored: Vec<(f32, &IndexedDocument)> = entries
            .iter()
            .map(|entry| (query_vector.cosine(&entry.embedding), entry))
            .collect();

        // Stable sort keeps insertion order between equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| entry.document.clone())
            .collect())
    }

    fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RetrievalError::LockPoisoned)?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn seeded() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::new();
        store
            .add_documents(vec![
                Document::new("인공지능(AI)은 인간의 학습능력과 추론능력을 컴퓨터로 구현한 기술입니다."),
                Document::new("머신러닝은 데이터로부터 패턴을 학습하는 인공지능의 한 분야입니다."),
                Document::new("LangGraph는 상태 기반 워크플로우를 구성하는 라이브러리입니다."),
                Document::new("파이썬은 읽기 쉬운 문법을 가진 프로그래밍 언어입니다."),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_search_ranks_relevant_document_first() {
        let store = seeded();
        let results = store.similarity_search("LangGraph에 대해 설명해줘", 3).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].page_content.starts_with("LangGraph"));

        let results = store.similarity_search("머신러닝이란 무엇인가요?", 1).unwrap();
        assert!(results[0].page_content.starts_with("머신러닝"));
    }

    #[test]
    fn test_search_returns_at_most_k() {
        let store = seeded();
        assert_eq!(store.similarity_search("anything", 10).unwrap().len(), 4);
        assert!(store.similarity_search("anything", 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        let store = InMemoryVectorStore::new();
        assert!(store.similarity_search("인공지능", 3).unwrap().is_empty());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let store = InMemoryVectorStore::new();
        store
            .add_documents(vec![Document::new("first"), Document::new("second")])
            .unwrap();
        let results = store.similarity_search("unrelated", 2).unwrap();
        assert_eq!(results[0].page_content, "first");
        assert_eq!(results[1].page_content, "second");
    }

    #[test]
    fn test_concurrent_inserts_and_searches() {
        let store = Arc::new(seeded());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .add_documents(vec![Document::new(format!("문서 {}", i))])
                        .unwrap();
                    store.similarity_search("문서", 2).unwrap().len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(store.len().unwrap(), 12);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = Arc::new(InMemoryVectorStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison");
        })
        .join();

        assert!(store.similarity_search("q", 1).is_err());
        assert!(store.add_documents(vec![Document::new("x")]).is_err());
    }
}
