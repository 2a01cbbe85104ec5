//! Simple CLI configuration loader for toolflow
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./toolflow.json or ./.toolflow/config.json
//! 3. Git repository root: <repo_root>/.toolflow/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/toolflow/config.json or the platform config dir
//! 5. Environment variables only (no files)
//!
//! A missing API key is not an error: the workflow then runs without an LLM.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toolflow_core::{ModelParams, Protocol, ResolvedLlmConfig, WorkflowConfig};
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "toolflow.json";
const CONFIG_DIR_NAME: &str = ".toolflow";

/// Raw configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// LLM connection settings (optional)
    #[serde(default)]
    pub llm: Option<RawLlmConfig>,
    /// Workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// LLM section of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLlmConfig {
    /// Protocol to use
    pub protocol: Option<String>,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: Option<String>,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    /// Model name (optional, uses protocol default if not specified)
    pub model: Option<String>,
    /// Model parameters (optional)
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers (optional)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// PEM bundle with extra root certificates (optional)
    pub ca_bundle: Option<PathBuf>,
}

/// Fully loaded CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Resolved LLM configuration, `None` when no credentials were found
    pub llm: Option<ResolvedLlmConfig>,
    /// Workflow settings
    pub workflow: WorkflowConfig,
    /// File the configuration came from, if any
    pub source: Option<PathBuf>,
}

/// CLI configuration loader
#[derive(Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    protocol_override: Option<String>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    /// Skip environment lookups (tests)
    ignore_env: bool,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set protocol override
    pub fn with_protocol_override(mut self, protocol: String) -> Self {
        self.protocol_override = Some(protocol);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    #[cfg(test)]
    fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<CliConfig> {
        // Step 1: Find and load base configuration
        let (raw, source) = if let Some(override_path) = &self.config_override {
            let (raw, path) = self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?;
            (raw, Some(path))
        } else {
            match self.search_and_load().await? {
                Some((raw, path)) => (raw, Some(path)),
                None => (RawConfig::default(), None),
            }
        };

        if let Some(path) = &source {
            debug!("Loaded configuration from {}", path.display());
        }

        // Step 2: Fall back to environment variables for the LLM section
        let mut llm = match raw.llm {
            Some(llm) => llm,
            None => self.llm_from_env(),
        };

        // Step 3: Apply flag overrides
        if let Some(protocol) = &self.protocol_override {
            llm.protocol = Some(protocol.clone());
        }
        if let Some(api_key) = &self.api_key_override {
            llm.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            llm.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            llm.model = Some(model.clone());
        }

        // Step 4: Resolve to final configuration
        Ok(CliConfig {
            llm: self.resolve_llm(llm)?,
            workflow: raw.workflow,
            source,
        })
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<Option<(RawConfig, PathBuf)>> {
        let mut candidates = Vec::new();

        let cwd = std::env::current_dir()?;
        candidates.push(cwd.join(CONFIG_FILE_NAME));
        candidates.push(cwd.join(CONFIG_DIR_NAME).join("config.json"));

        if let Some(git_root) = find_git_root(&cwd) {
            candidates.push(git_root.join(CONFIG_DIR_NAME).join("config.json"));
        }

        if let Some(config_dir) = self.xdg_config_dir() {
            candidates.push(config_dir.join("toolflow").join("config.json"));
        }

        for path in candidates {
            if path.is_file() {
                let raw = load_file(&path).await?;
                return Ok(Some((raw, path)));
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<(RawConfig, PathBuf)> {
        if path.is_file() {
            Ok((load_file(path).await?, path.to_path_buf()))
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                Ok((load_file(&config_file).await?, config_file))
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Build the LLM section from environment variables
    fn llm_from_env(&self) -> RawLlmConfig {
        let openai_key = self.env("OPENAI_API_KEY");
        let anthropic_key = self.env("ANTHROPIC_API_KEY");

        let protocol = self
            .protocol_override
            .clone()
            .or_else(|| self.env("TOOLFLOW_PROTOCOL"))
            .or_else(|| match (&openai_key, &anthropic_key) {
                (None, Some(_)) => Some("anthropic".to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "openai".to_string());

        let api_key = match Protocol::parse(&protocol) {
            Protocol::Anthropic => anthropic_key,
            _ => openai_key,
        };

        RawLlmConfig {
            protocol: Some(protocol),
            api_key,
            base_url: self.env("TOOLFLOW_BASE_URL"),
            model: self.env("TOOLFLOW_MODEL"),
            params: ModelParams::default(),
            headers: HashMap::new(),
            ca_bundle: self.env("TOOLFLOW_CA_BUNDLE").map(PathBuf::from),
        }
    }

    /// Resolve the raw LLM section; `None` means no usable API key
    fn resolve_llm(&self, raw: RawLlmConfig) -> Result<Option<ResolvedLlmConfig>> {
        let protocol = Protocol::parse(raw.protocol.as_deref().unwrap_or("openai"));

        // Resolve API key (handle env: prefix)
        let api_key = match raw.api_key {
            Some(key) => match key.strip_prefix("env:") {
                Some(var_name) => {
                    let value = self.env(var_name);
                    if value.is_none() {
                        warn!("Environment variable not found: {}", var_name);
                    }
                    value
                }
                None => Some(key),
            },
            None => None,
        };

        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            info!("No API key configured, responses will use raw tool results");
            return Ok(None);
        };

        let base_url = match raw.base_url {
            Some(base_url) => base_url,
            None => protocol
                .default_base_url()
                .ok_or_else(|| anyhow!("Protocol '{}' requires a base_url", protocol.as_str()))?
                .to_string(),
        };

        let model = raw
            .model
            .unwrap_or_else(|| protocol.default_model().to_string());

        let resolved = ResolvedLlmConfig::new(protocol, base_url, api_key, model)
            .with_params(raw.params)
            .with_headers(raw.headers)
            .with_ca_bundle(raw.ca_bundle);

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(Some(resolved))
    }

    fn env(&self, name: &str) -> Option<String> {
        if self.ignore_env {
            return None;
        }
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn xdg_config_dir(&self) -> Option<PathBuf> {
        self.env("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
    }
}

/// Load a single config file
async fn load_file(path: &Path) -> Result<RawConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Find git repository root
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_full_config_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "llm": {"protocol": "anthropic", "api_key": "sk-ant-test"},
                "workflow": {"top_k": 5}
            }"#,
        );

        let config = CliConfigLoader::new()
            .without_env()
            .with_config_override(path.clone())
            .load()
            .await
            .unwrap();

        let llm = config.llm.unwrap();
        assert_eq!(llm.protocol, Protocol::Anthropic);
        assert_eq!(llm.base_url, "https://api.anthropic.com");
        assert_eq!(llm.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.workflow.top_k, 5);
        assert_eq!(config.workflow.chunk_size, 1000);
        assert_eq!(config.source, Some(path));
    }

    #[tokio::test]
    async fn test_directory_override_and_flag_overrides() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, r#"{"llm": {"api_key": "sk-test"}}"#);

        let config = CliConfigLoader::new()
            .without_env()
            .with_config_override(dir.path().to_path_buf())
            .with_model_override("gpt-4o-mini".to_string())
            .with_base_url_override("http://localhost:8080/v1".to_string())
            .load()
            .await
            .unwrap();

        let llm = config.llm.unwrap();
        assert_eq!(llm.protocol, Protocol::OpenAICompat);
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.base_url, "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn test_missing_key_means_no_llm() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"llm": {"api_key": "env:TOOLFLOW_UNSET_TEST_KEY"}}"#);

        let config = CliConfigLoader::new()
            .without_env()
            .with_config_override(path)
            .load()
            .await
            .unwrap();
        assert!(config.llm.is_none());
    }

    #[tokio::test]
    async fn test_api_key_flag_enables_llm() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"workflow": {"strict_generation": true}}"#);

        let config = CliConfigLoader::new()
            .without_env()
            .with_config_override(path)
            .with_api_key_override("sk-flag".to_string())
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.map(|llm| llm.api_key), Some("sk-flag".to_string()));
        assert!(config.workflow.strict_generation);
    }

    #[tokio::test]
    async fn test_invalid_files_are_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");
        let result = CliConfigLoader::new()
            .without_env()
            .with_config_override(path)
            .load()
            .await;
        assert!(result.is_err());

        let result = CliConfigLoader::new()
            .without_env()
            .with_config_override(dir.path().join("missing.json"))
            .load()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_protocol_requires_base_url() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"llm": {"protocol": "azure_openai", "api_key": "k"}}"#);
        let result = CliConfigLoader::new()
            .without_env()
            .with_config_override(path)
            .load()
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_find_git_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_git_root(&nested), Some(dir.path().to_path_buf()));
    }
}
