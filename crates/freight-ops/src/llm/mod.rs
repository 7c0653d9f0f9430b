//! Text-generation clients and the enrichment wrapper built on them.

mod client;
mod enrich;
mod extract;

pub use client::{AnthropicGenerator, OpenAiGenerator};
pub use enrich::{CallBudget, Enricher, Enrichment, EnrichmentFailure, ResponseContract};
pub use extract::extract_json;

use crate::config::{ConfigError, Credentials, ModelConfig, Provider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// One prompt/response exchange with a hosted model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: Provider,
        status: u16,
        message: String,
    },
    #[error("response contained no text")]
    EmptyResponse,
    #[error("text generation is disabled")]
    Unavailable,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Generator that never reaches a model; every call takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

/// Build the HTTP client for a model's provider.
///
/// Fails when the provider's API key is not configured.
pub fn generator_for(
    model: &ModelConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn TextGenerator>, ConfigError> {
    let api_key = credentials.api_key(model.provider)?.to_string();
    let base_url = model.base_url.clone();
    Ok(match model.provider {
        Provider::Anthropic => Arc::new(AnthropicGenerator::new(api_key, base_url)),
        Provider::OpenAi => Arc::new(OpenAiGenerator::new(api_key, base_url)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(provider: Provider) -> ModelConfig {
        ModelConfig {
            provider,
            model: "test-model".to_string(),
            temperature: None,
            max_tokens: Some(512),
            timeout_seconds: 5,
            base_url: None,
        }
    }

    #[test]
    fn generator_requires_provider_key() {
        let credentials = Credentials {
            anthropic_api_key: Some("sk-ant".to_string()),
            openai_api_key: None,
        };
        assert!(generator_for(&model(Provider::Anthropic), &credentials).is_ok());
        assert!(matches!(
            generator_for(&model(Provider::OpenAi), &credentials),
            Err(ConfigError::MissingApiKey(Provider::OpenAi))
        ));
    }

    #[tokio::test]
    async fn offline_generator_is_unavailable() {
        let request = GenerationRequest {
            prompt: "hello".to_string(),
            system_prompt: None,
            model: "none".to_string(),
            temperature: 0.0,
            max_tokens: 1,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            OfflineGenerator.generate(request).await,
            Err(GenerationError::Unavailable)
        ));
    }
}
