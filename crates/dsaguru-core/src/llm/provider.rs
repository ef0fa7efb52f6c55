//! LlmProvider trait definition.
//!
//! Uses RPITIT for `complete`. Implementations live in dsaguru-infra
//! (`GeminiProvider`, `OpenAiCompatibleProvider`).

use dsaguru_types::llm::{CompletionRequest, CompletionResponse, UpstreamError};

/// Trait for hosted LLM backends.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send one completion request and receive the full response.
    ///
    /// Exactly one upstream call per invocation. No retries.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, UpstreamError>> + Send;
}
