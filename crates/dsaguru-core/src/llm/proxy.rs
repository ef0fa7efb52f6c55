//! Single-shot LLM proxy.
//!
//! `LlmProxy` sends one in-scope question plus the system instruction to the
//! configured provider and normalizes the answer. Errors surface as
//! `UpstreamError`; the pipeline turns them into the apology text.

use tracing::{Instrument, debug, info_span, warn};

use dsaguru_types::chat::EMPTY_ANSWER_FALLBACK;
use dsaguru_types::llm::{CompletionRequest, Message, UpstreamError};

use super::box_provider::BoxLlmProvider;

/// Forwards questions to the hosted model.
#[derive(Debug)]
pub struct LlmProxy {
    provider: BoxLlmProvider,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl LlmProxy {
    pub fn new(provider: BoxLlmProvider, max_tokens: u32, temperature: Option<f64>) -> Self {
        Self {
            provider,
            max_tokens,
            temperature,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the model one question.
    ///
    /// Returns the answer text, or [`EMPTY_ANSWER_FALLBACK`] when the model
    /// produced nothing but whitespace. Exactly one upstream call.
    pub async fn ask(
        &self,
        question: &str,
        system_instruction: &str,
    ) -> Result<String, UpstreamError> {
        let request = self.build_request(question, system_instruction);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %self.provider.model(),
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );

        let response = match self.provider.complete(&request).instrument(span).await {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "LLM call failed");
                return Err(e);
            }
        };

        debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM call completed"
        );

        if response.content.trim().is_empty() {
            return Ok(EMPTY_ANSWER_FALLBACK.to_string());
        }
        Ok(response.content)
    }

    fn build_request(&self, question: &str, system_instruction: &str) -> CompletionRequest {
        let system = if system_instruction.trim().is_empty() {
            None
        } else {
            Some(system_instruction.to_string())
        };

        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user(question)],
            system,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
