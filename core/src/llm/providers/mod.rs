//! LLM provider implementations and client construction

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use crate::config::{Protocol, ResolvedLlmConfig};
use crate::error::{LlmError, Result};
use crate::llm::LlmClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// Create an LLM client for the configured protocol
pub fn create_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match &config.protocol {
        Protocol::OpenAICompat => Arc::new(OpenAiClient::new(config)?),
        Protocol::Anthropic => Arc::new(AnthropicClient::new(config)?),
        Protocol::Custom(name) => {
            return Err(LlmError::UnsupportedProtocol {
                protocol: name.clone(),
            }
            .into())
        }
    };

    tracing::debug!(
        "Created {} client for model {}",
        client.provider_name(),
        client.model_name()
    );

    Ok(client)
}

/// Build the HTTP client shared by the providers
///
/// Extra root certificates and default headers come from the resolved
/// configuration; nothing is read from the process environment here.
pub(crate) fn build_http_client(config: &ResolvedLlmConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().default_headers(default_headers(config)?);

    if let Some(path) = &config.ca_bundle {
        let pem = std::fs::read(path)?;
        let certificate = reqwest::Certificate::from_pem(&pem)?;
        builder = builder.add_root_certificate(certificate);
        tracing::debug!("Trusting extra CA bundle: {}", path.display());
    }

    Ok(builder.build()?)
}

fn default_headers(config: &ResolvedLlmConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| LlmError::InvalidRequest {
            message: format!("Invalid header name '{}': {}", key, e),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| LlmError::InvalidRequest {
            message: format!("Invalid value for header '{}': {}", key, e),
        })?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(protocol: Protocol) -> ResolvedLlmConfig {
        ResolvedLlmConfig::new(
            protocol,
            "https://api.example.com".to_string(),
            "test-key".to_string(),
            "test-model".to_string(),
        )
    }

    #[test]
    fn test_create_client_for_known_protocols() {
        let client = create_client(&config(Protocol::OpenAICompat)).unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.model_name(), "test-model");

        let client = create_client(&config(Protocol::Anthropic)).unwrap();
        assert_eq!(client.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_client_rejects_custom_protocol() {
        let result = create_client(&config(Protocol::Custom("carrier-pigeon".to_string())));
        assert!(matches!(
            result,
            Err(crate::error::Error::Llm(LlmError::UnsupportedProtocol { .. }))
        ));
    }

    #[test]
    fn test_create_client_rejects_azure() {
        let protocol = Protocol::parse("azure_openai");
        assert_eq!(protocol, Protocol::Custom("azure_openai".to_string()));

        let result = create_client(&config(protocol));
        assert!(matches!(
            result,
            Err(crate::error::Error::Llm(LlmError::UnsupportedProtocol { .. }))
        ));
    }

    #[test]
    fn test_missing_ca_bundle_fails_construction() {
        let config = config(Protocol::OpenAICompat)
            .with_ca_bundle(Some("/definitely/not/here.pem".into()));
        assert!(create_client(&config).is_err());
    }

    #[test]
    fn test_invalid_header_fails_construction() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("bad header".to_string(), "value".to_string());
        let config = config(Protocol::OpenAICompat).with_headers(headers);
        assert!(create_client(&config).is_err());
    }
}
