//! Sample corpus seeded into the document index at startup

use anyhow::Result;
use std::sync::Arc;
use toolflow_core::retrieval::{RecursiveTextSplitter, VectorStore};
use toolflow_core::{InMemoryVectorStore, WorkflowConfig};
use tracing::debug;

/// Short Korean passages on AI topics
pub const SAMPLE_DOCUMENTS: [&str; 10] = [
    "인공지능(AI)은 인간의 학습능력과 추론능력, 지각능력, 자연언어의 이해능력 등을 컴퓨터 프로그램으로 실현한 기술입니다.",
    "머신러닝은 데이터로부터 패턴을 학습하여 예측이나 분류를 수행하는 AI의 한 분야입니다.",
    "딥러닝은 인공신경망을 기반으로 한 머신러닝 기법으로, 복잡한 패턴을 학습할 수 있습니다.",
    "자연어처리(NLP)는 인간의 언어를 컴퓨터가 이해하고 처리할 수 있도록 하는 기술입니다.",
    "컴퓨터 비전은 컴퓨터가 디지털 이미지나 비디오로부터 의미 있는 정보를 추출하고 이해하는 기술입니다.",
    "강화학습은 에이전트가 환경과 상호작용하며 보상을 최대화하는 방향으로 학습하는 방법입니다.",
    "LangGraph는 LangChain 기반의 복잡한 AI 애플리케이션을 구축하기 위한 프레임워크입니다.",
    "LangChain은 대규모 언어 모델을 활용한 애플리케이션 개발을 위한 프레임워크입니다.",
    "RAG(Retrieval-Augmented Generation)는 외부 지식베이스를 검색하여 더 정확한 답변을 생성하는 기술입니다.",
    "벡터 데이터베이스는 고차원 벡터를 저장하고 유사도 검색을 지원하는 데이터베이스입니다.",
];

/// Create an in-memory index holding the sample corpus
///
/// Each passage is tagged `doc_<i>`; chunk ids run across the whole corpus.
pub fn seeded_store(config: &WorkflowConfig) -> Result<Arc<dyn VectorStore>> {
    let splitter = RecursiveTextSplitter::new(config.chunk_size, config.chunk_overlap)?;
    let store = InMemoryVectorStore::new();

    let mut documents = Vec::new();
    for (i, text) in SAMPLE_DOCUMENTS.iter().enumerate() {
        let chunks = splitter.create_documents(text, &format!("doc_{}", i), documents.len());
        documents.extend(chunks);
    }

    let added = store.add_documents(documents)?;
    debug!("Seeded document index with {} chunks", added);

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_has_every_passage() {
        let store = seeded_store(&WorkflowConfig::default()).unwrap();
        assert_eq!(store.len().unwrap(), SAMPLE_DOCUMENTS.len());

        let results = store.similarity_search("강화학습", 1).unwrap();
        assert_eq!(results[0].source(), Some("doc_5"));
        assert_eq!(results[0].metadata["chunk_id"], serde_json::json!(5));
    }
}
