//! Configuration and well-known defaults for OpenAI-compatible providers.

use secrecy::SecretString;

/// Default endpoint when no base URL is configured.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "local").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

/// OpenAI default configuration.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Configuration for a self-hosted or third-party endpoint.
///
/// The provider name is derived from the host so logs distinguish endpoints.
pub fn custom_endpoint(api_key: SecretString, model: &str, base_url: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: provider_name_for(base_url),
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
        model: model.into(),
    }
}

fn provider_name_for(base_url: &str) -> String {
    let host = base_url
        .split("://")
        .nth(1)
        .unwrap_or(base_url)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();

    match host {
        "api.openai.com" => "openai".to_string(),
        "" => "openai_compatible".to_string(),
        other => other.to_string(),
    }
}
