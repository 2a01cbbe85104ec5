//! CLI tool registry backed by the sample corpus

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use toolflow_core::router::DOCUMENT_UPLOAD;
use toolflow_core::{Tool, ToolRegistry, WorkflowConfig};
use tracing::info;

/// Create the registry with all built-in tools over the seeded index
pub fn create_cli_tool_registry(config: &WorkflowConfig) -> Result<ToolRegistry> {
    let store = super::seeded_store(config)?;
    let registry = ToolRegistry::with_builtin_tools(Some(store), config)?;
    Ok(registry)
}

/// Add local files to the index through the upload tool
pub async fn upload_documents(registry: &ToolRegistry, paths: &[PathBuf]) -> Result<Vec<String>> {
    let tool = registry
        .get(DOCUMENT_UPLOAD)
        .ok_or_else(|| anyhow!("Tool not registered: {}", DOCUMENT_UPLOAD))?;

    let mut replies = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let reply = tool
            .run(&text)
            .await
            .with_context(|| format!("Failed to upload document: {}", path.display()))?;
        info!("{}: {}", path.display(), reply);
        replies.push(reply);
    }

    Ok(replies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolflow_core::router::{CALCULATOR, RAG_SEARCH, TEXT_PROCESSOR};

    #[test]
    fn test_cli_registry_has_all_tools() {
        let registry = create_cli_tool_registry(&WorkflowConfig::default()).unwrap();
        assert_eq!(
            registry.list_tools(),
            vec![CALCULATOR, DOCUMENT_UPLOAD, RAG_SEARCH, TEXT_PROCESSOR]
        );
    }

    #[tokio::test]
    async fn test_upload_then_search() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Quokkatron is the codename of our retrieval test fixture.").unwrap();

        let registry = create_cli_tool_registry(&WorkflowConfig::default()).unwrap();
        let replies = upload_documents(&registry, &[path]).await.unwrap();
        assert_eq!(
            replies,
            vec!["문서가 성공적으로 추가되었습니다. 1개의 청크로 분할되었습니다.".to_string()]
        );

        let search = registry.get(RAG_SEARCH).unwrap();
        let result = search.run("quokkatron").await.unwrap();
        assert!(result.contains("1. Quokkatron"));
    }

    #[tokio::test]
    async fn test_missing_document_is_an_error() {
        let registry = create_cli_tool_registry(&WorkflowConfig::default()).unwrap();
        let result = upload_documents(&registry, &[PathBuf::from("/nonexistent/doc.txt")]).await;
        assert!(result.is_err());
    }
}
