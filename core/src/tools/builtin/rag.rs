//! Retrieval tools over a shared vector store

use crate::error::Result;
use crate::retrieval::{Document, RecursiveTextSplitter, VectorStore};
use crate::router::{DOCUMENT_UPLOAD, RAG_SEARCH};
use crate::tools::{Tool, ToolExample};
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;

const NOT_INITIALIZED: &str = "RAG 시스템이 초기화되지 않았습니다.";

/// Searches the document index and lists the closest passages
pub struct RagSearchTool {
    store: Option<Arc<dyn VectorStore>>,
    top_k: usize,
}

impl RagSearchTool {
    pub fn new(store: Option<Arc<dyn VectorStore>>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    fn format_results(query: &str, documents: &[Document]) -> String {
        let mut result = format!("검색 쿼리: {}\n\n관련 문서:\n", query);
        for (i, doc) in documents.iter().enumerate() {
            let _ = write!(result, "{}. {}\n\n", i + 1, doc.page_content);
        }
        let _ = write!(
            result,
            "검색된 {}개의 문서에서 관련 정보를 찾았습니다. 위의 문서들을 참고하여 질문에 답변하시기 바랍니다.",
            documents.len()
        );
        result
    }
}

#[async_trait]
impl Tool for RagSearchTool {
    fn name(&self) -> &str {
        RAG_SEARCH
    }

    fn description(&self) -> &str {
        "문서 데이터베이스에서 관련 정보를 검색하고 답변을 생성합니다."
    }

    async fn run(&self, query: &str) -> Result<String> {
        let Some(store) = &self.store else {
            return Ok(NOT_INITIALIZED.to_string());
        };

        let documents = match store.similarity_search(query, self.top_k) {
            Ok(documents) => documents,
            Err(e) => return Ok(format!("RAG 검색 오류: {}", e)),
        };

        if documents.is_empty() {
            return Ok("관련된 문서를 찾을 수 없습니다.".to_string());
        }

        tracing::debug!("Retrieved {} passages", documents.len());
        Ok(Self::format_results(query, &documents))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample::new(
            "Look up a topic",
            "머신러닝이란 무엇인가요?",
            "Numbered list of the closest passages",
        )]
    }
}

/// Splits the query text into chunks and adds them to the index
pub struct DocumentUploadTool {
    store: Option<Arc<dyn VectorStore>>,
    splitter: RecursiveTextSplitter,
}

impl DocumentUploadTool {
    pub fn new(
        store: Option<Arc<dyn VectorStore>>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self> {
        Ok(Self {
            store,
            splitter: RecursiveTextSplitter::new(chunk_size, chunk_overlap)?,
        })
    }
}

#[async_trait]
impl Tool for DocumentUploadTool {
    fn name(&self) -> &str {
        DOCUMENT_UPLOAD
    }

    fn description(&self) -> &str {
        "새로운 문서를 RAG 시스템에 추가합니다."
    }

    async fn run(&self, document_text: &str) -> Result<String> {
        let Some(store) = &self.store else {
            return Ok(NOT_INITIALIZED.to_string());
        };

        let documents = self.splitter.create_documents(document_text, "user_upload", 0);
        let chunk_count = documents.len();

        if let Err(e) = store.add_documents(documents) {
            return Ok(format!("문서 업로드 오류: {}", e));
        }

        Ok(format!(
            "문서가 성공적으로 추가되었습니다. {}개의 청크로 분할되었습니다.",
            chunk_count
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::InMemoryVectorStore;

    fn shared_store() -> Arc<dyn VectorStore> {
        let store = InMemoryVectorStore::new();
        store
            .add_documents(vec![
                Document::new("머신러닝은 데이터로부터 패턴을 학습하여 예측이나 분류를 수행하는 AI의 한 분야입니다."),
                Document::new("벡터 데이터베이스는 고차원 벡터를 저장하고 유사도 검색을 지원하는 데이터베이스입니다."),
            ])
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_search_formats_numbered_passages() {
        let tool = RagSearchTool::new(Some(shared_store()), 1);
        let result = tool.run("머신러닝이란 무엇인가요?").await.unwrap();

        assert!(result.starts_with("검색 쿼리: 머신러닝이란 무엇인가요?\n\n관련 문서:\n1. 머신러닝은"));
        assert!(result.ends_with(
            "검색된 1개의 문서에서 관련 정보를 찾았습니다. 위의 문서들을 참고하여 질문에 답변하시기 바랍니다."
        ));
    }

    #[tokio::test]
    async fn test_missing_store() {
        let search = RagSearchTool::new(None, 3);
        assert_eq!(search.run("q").await.unwrap(), NOT_INITIALIZED);

        let upload = DocumentUploadTool::new(None, 1000, 200).unwrap();
        assert_eq!(upload.run("text").await.unwrap(), NOT_INITIALIZED);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let tool = RagSearchTool::new(Some(Arc::new(InMemoryVectorStore::new())), 3);
        assert_eq!(tool.run("q").await.unwrap(), "관련된 문서를 찾을 수 없습니다.");
    }

    #[tokio::test]
    async fn test_upload_then_search_finds_document() {
        let store = shared_store();
        let upload = DocumentUploadTool::new(Some(store.clone()), 1000, 200).unwrap();
        let search = RagSearchTool::new(Some(store.clone()), 3);

        let reply = upload
            .run("Zyxorbium is a fictional element discovered in tests.")
            .await
            .unwrap();
        assert_eq!(
            reply,
            "문서가 성공적으로 추가되었습니다. 1개의 청크로 분할되었습니다."
        );
        assert_eq!(store.len().unwrap(), 3);

        let result = search.run("zyxorbium").await.unwrap();
        assert!(result.contains("1. Zyxorbium is a fictional element"));
    }
}
