//! LLM provider implementations.
//!
//! Concrete implementations of the [`LlmProvider`](dsaguru_core::llm::LlmProvider)
//! trait, plus [`create_provider`] which picks one from [`LlmConfig`].

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use dsaguru_core::llm::{BoxLlmProvider, LlmProvider};
use dsaguru_types::config::LlmConfig;
use dsaguru_types::llm::{CompletionRequest, CompletionResponse, ProviderType, UpstreamError};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from an [`LlmConfig`].
///
/// # Errors
///
/// Returns [`UpstreamError::Authentication`] when no API key is available,
/// or [`UpstreamError::Configuration`] when the HTTP client cannot be built.
pub fn create_provider(
    config: &LlmConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, UpstreamError> {
    let key = api_key.ok_or(UpstreamError::Authentication)?;
    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    match config.provider {
        ProviderType::Gemini => {
            let mut provider = GeminiProvider::new(key, config.model.clone(), timeout)?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let oai_config = match config.base_url.as_deref() {
                Some(base_url) => openai_compat::config::custom_endpoint(key, &config.model, base_url),
                None => openai_compat::config::openai_defaults(key, &config.model),
            };
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(
                oai_config, timeout,
            )))
        }
    }
}

/// Stand-in for a provider that could not be built.
///
/// Every call fails with [`UpstreamError::Configuration`], which the pipeline
/// answers with the apology text. Lets the quota and routing surfaces keep
/// working when no API key is set.
pub struct UnconfiguredProvider {
    model: String,
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        Err(UpstreamError::Configuration(self.reason.clone()))
    }
}

/// Like [`create_provider`], but falls back to an [`UnconfiguredProvider`]
/// and logs a warning instead of failing.
pub fn create_provider_or_unconfigured(
    config: &LlmConfig,
    api_key: Option<SecretString>,
) -> BoxLlmProvider {
    match create_provider(config, api_key) {
        Ok(provider) => provider,
        Err(err) => {
            tracing::warn!(
                provider = %config.provider,
                api_key_env = %config.api_key_env,
                error = %err,
                "LLM provider unavailable, questions will be answered with an apology"
            );
            BoxLlmProvider::new(UnconfiguredProvider::new(
                config.model.clone(),
                format!("{} is not configured: {err}", config.provider),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Option<SecretString> {
        Some(SecretString::from("test-key".to_string()))
    }

    #[test]
    fn test_create_provider_gemini_default() {
        let provider = create_provider(&LlmConfig::default(), key()).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_create_provider_openai_compatible_with_base_url() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            model: "llama3".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, key()).unwrap();
        assert_eq!(provider.name(), "localhost");
        assert_eq!(provider.model(), "llama3");
    }

    #[test]
    fn test_create_provider_openai_compatible_default_endpoint() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            model: "gpt-4o-mini".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, key()).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_provider_missing_key() {
        let result = create_provider(&LlmConfig::default(), None);
        match result {
            Err(UpstreamError::Authentication) => {}
            Err(other) => panic!("Expected Authentication, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_unconfigured() {
        let provider = create_provider_or_unconfigured(&LlmConfig::default(), None);
        assert_eq!(provider.name(), "unconfigured");

        let request = CompletionRequest {
            model: String::new(),
            messages: vec![],
            system: None,
            max_tokens: 8,
            temperature: None,
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Configuration(_)));
    }
}
