//! Quota-gated question pipeline.
//!
//! `QuestionPipeline::handle_question` composes the quota gate, topic router,
//! and LLM proxy into one call that always produces displayable text:
//!
//! 1. Admission. An exhausted quota short-circuits to `Denied` with no LLM
//!    call and no usage recorded.
//! 2. Classification. Off-topic questions get the canned refusal. They are
//!    only charged when `charge_off_topic` is enabled.
//! 3. Answering. The proxy is called once; an upstream failure becomes the
//!    apology text. Usage is recorded exactly once either way, because the
//!    user spent an attempt.
//!
//! The only errors surfaced to callers are malformed input.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use dsaguru_types::chat::{APOLOGY_MESSAGE, PipelineResult};
use dsaguru_types::config::GuruConfig;
use dsaguru_types::quota::QuotaSnapshot;

use crate::clock::Clock;
use crate::llm::{BoxLlmProvider, LlmProxy};
use crate::quota::gate::QuotaGate;
use crate::quota::store::QuotaStore;
use crate::topic::{TopicClass, TopicRouter};

/// Longest accepted question, in characters, after trimming.
pub const MAX_QUESTION_CHARS: usize = 4_000;

/// Identity and correlation id for one question.
///
/// The user id is always passed explicitly; nothing in the pipeline reads
/// ambient auth state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub user_id: String,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            user_id: user_id.into(),
        }
    }
}

/// Input rejected before any quota or LLM work happens.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("question is too long ({actual} characters, max {max})")]
    QuestionTooLong { max: usize, actual: usize },
}

/// Entry point for asking questions.
pub struct QuestionPipeline<S: QuotaStore> {
    gate: QuotaGate<S>,
    router: TopicRouter,
    proxy: LlmProxy,
    system_instruction: String,
    charge_off_topic: bool,
}

impl<S: QuotaStore> QuestionPipeline<S> {
    pub fn new(
        gate: QuotaGate<S>,
        router: TopicRouter,
        proxy: LlmProxy,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            gate,
            router,
            proxy,
            system_instruction: system_instruction.into(),
            charge_off_topic: false,
        }
    }

    /// Wire a pipeline from configuration.
    pub fn from_config(
        store: S,
        clock: Arc<dyn Clock>,
        provider: BoxLlmProvider,
        config: &GuruConfig,
    ) -> Self {
        let gate = QuotaGate::new(store, clock, config.quota.max_daily_queries);
        let router = TopicRouter::from_config(&config.topic);
        let proxy = LlmProxy::new(
            provider,
            config.llm.max_output_tokens,
            config.llm.temperature,
        );
        Self::new(gate, router, proxy, config.system_instruction.clone())
            .with_charge_off_topic(config.quota.charge_off_topic)
    }

    /// Whether off-topic refusals consume a quota unit.
    pub fn with_charge_off_topic(mut self, charge: bool) -> Self {
        self.charge_off_topic = charge;
        self
    }

    pub fn gate(&self) -> &QuotaGate<S> {
        &self.gate
    }

    /// Current quota for a user. Never fails.
    pub async fn check_admission(&self, user_id: &str) -> QuotaSnapshot {
        self.gate.check_admission(user_id).await
    }

    /// Handle one question end to end.
    pub async fn handle_question(
        &self,
        ctx: &RequestContext,
        question: &str,
    ) -> Result<PipelineResult, PipelineError> {
        let question = validate_question(question)?;

        let span = info_span!(
            "question",
            request_id = %ctx.request_id,
            user_id = %ctx.user_id,
        );
        Ok(self.run(&ctx.user_id, question).instrument(span).await)
    }

    async fn run(&self, user_id: &str, question: &str) -> PipelineResult {
        let admission = self.gate.check_admission(user_id).await;
        if !admission.can_query {
            info!("Daily limit reached, question denied");
            return PipelineResult::Denied { remaining: 0 };
        }

        match self.router.classify(question) {
            TopicClass::OutOfScope => {
                let remaining = if self.charge_off_topic {
                    self.charge(user_id, admission).await
                } else {
                    admission.remaining
                };
                debug!(charged = self.charge_off_topic, "Question out of scope");
                PipelineResult::Refused {
                    message: self.router.refusal_message().to_string(),
                    remaining,
                }
            }
            TopicClass::InScope => {
                let text = match self.proxy.ask(question, &self.system_instruction).await {
                    Ok(answer) => answer,
                    Err(_) => APOLOGY_MESSAGE.to_string(),
                };
                let remaining = self.charge(user_id, admission).await;
                PipelineResult::Answered { text, remaining }
            }
        }
    }

    /// Record one unit of usage and return what is left.
    ///
    /// Falls back to one less than the admission snapshot when the store
    /// cannot record the usage.
    async fn charge(&self, user_id: &str, admission: QuotaSnapshot) -> u32 {
        match self.gate.record_usage(user_id).await {
            Ok(record) => self.gate.snapshot_of(&record).remaining,
            Err(_) => admission.remaining.saturating_sub(1),
        }
    }
}

fn validate_question(question: &str) -> Result<&str, PipelineError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::EmptyQuestion);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_QUESTION_CHARS {
        return Err(PipelineError::QuestionTooLong {
            max: MAX_QUESTION_CHARS,
            actual: chars,
        });
    }
    Ok(trimmed)
}
