//! Tool registry for managing available tools

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::retrieval::VectorStore;
use crate::tools::builtin::{CalculatorTool, DocumentUploadTool, RagSearchTool, TextProcessorTool};
use crate::tools::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed set of tools, fixed once the workflow is built
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the four built-in tools
    ///
    /// The retrieval tools share `store`; without one they answer with a
    /// not-initialized message.
    pub fn with_builtin_tools(
        store: Option<Arc<dyn VectorStore>>,
        config: &WorkflowConfig,
    ) -> Result<Self> {
        let mut registry = Self::new();

        registry.register(Arc::new(CalculatorTool::new()));
        registry.register(Arc::new(TextProcessorTool::new()));
        registry.register(Arc::new(RagSearchTool::new(store.clone(), config.top_k)));
        registry.register(Arc::new(DocumentUploadTool::new(
            store,
            config.chunk_size,
            config.chunk_overlap,
        )?));

        Ok(registry)
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names, sorted
    pub fn list_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get tool name and description
    pub fn get_tool_info(&self, name: &str) -> Option<(&str, &str)> {
        self.tools
            .get(name)
            .map(|tool| (tool.name(), tool.description()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::InMemoryVectorStore;
    use crate::router::{CALCULATOR, DOCUMENT_UPLOAD, RAG_SEARCH, TEXT_PROCESSOR};

    #[test]
    fn test_builtin_registry_has_all_tools() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
        let registry =
            ToolRegistry::with_builtin_tools(Some(store), &WorkflowConfig::default()).unwrap();

        assert_eq!(
            registry.list_tools(),
            vec![CALCULATOR, DOCUMENT_UPLOAD, RAG_SEARCH, TEXT_PROCESSOR]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_tool_info() {
        let registry = ToolRegistry::with_builtin_tools(None, &WorkflowConfig::default()).unwrap();
        let (name, description) = registry.get_tool_info(CALCULATOR).unwrap();
        assert_eq!(name, CALCULATOR);
        assert!(!description.is_empty());
        assert!(registry.get_tool_info("missing").is_none());
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_invalid_chunk_settings_fail() {
        let config = WorkflowConfig {
            chunk_size: 100,
            chunk_overlap: 100,
            ..Default::default()
        };
        assert!(ToolRegistry::with_builtin_tools(None, &config).is_err());
    }
}
