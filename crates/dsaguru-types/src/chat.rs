//! Chat exchange and pipeline result types.
//!
//! The pipeline never hands the caller an error for infrastructure failures;
//! every [`PipelineResult`] carries display text via [`PipelineResult::message`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of an answer when the upstream LLM call fails.
pub const APOLOGY_MESSAGE: &str = "Arre bhai, kuch toh gadbad ho gaya! Thoda baad mein try karo.";

/// Shown when the upstream call succeeds but returns no answer text.
pub const EMPTY_ANSWER_FALLBACK: &str = "Kuch toh gadbad ho gaya, bhai!";

/// Default reply to questions outside the DSA vocabulary.
pub const DEFAULT_REFUSAL_MESSAGE: &str = "Arre bhai, yeh kya baklol sawaal hai? DSA ke baare mein poochh, warna dhamki milegi!\n\n\
Main sirf Data Structures aur Algorithms ke sawal ka jawab deta hun. \
Stack, Queue, Trees, Sorting, Searching - yeh sab pooch sakta hai!";

/// Shown when the daily quota is exhausted.
pub const LIMIT_REACHED_MESSAGE: &str = "Daily limit reached! Try again tomorrow.";

/// Greeting shown before the first question. Costs no quota.
pub const WELCOME_MESSAGE: &str = "Namaste! Main tumhara DSA Guru hun!\n\n\
Mujhse koi bhi Data Structures aur Algorithms ka sawal pucho - Stack, Queue, Linked List, \
Trees, Sorting, kuch bhi! Main tumhe College Senior ki tarah samjhaunga with Java code examples.\n\n\
Bas yaad rakhna - sirf DSA ke sawal karna, warna main naraz ho jaunga!";

/// One displayed turn. Produced by callers for rendering; not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub question: String,
    pub is_user_turn: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatExchange {
    pub fn user(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            is_user_turn: true,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            question: text.into(),
            is_user_turn: false,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of handling one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineResult {
    /// Daily quota exhausted. The LLM was not called and no usage was recorded.
    Denied { remaining: u32 },

    /// Admitted, but the question is outside the assistant's subject matter.
    Refused { message: String, remaining: u32 },

    /// On-topic question answered (possibly with the canned apology).
    Answered { text: String, remaining: u32 },
}

impl PipelineResult {
    /// Text to display for this outcome.
    pub fn message(&self) -> &str {
        match self {
            PipelineResult::Denied { .. } => LIMIT_REACHED_MESSAGE,
            PipelineResult::Refused { message, .. } => message,
            PipelineResult::Answered { text, .. } => text,
        }
    }

    /// Questions left today after this outcome.
    pub fn remaining(&self) -> u32 {
        match self {
            PipelineResult::Denied { remaining }
            | PipelineResult::Refused { remaining, .. }
            | PipelineResult::Answered { remaining, .. } => *remaining,
        }
    }

    /// Whether the user may ask again today.
    pub fn can_query(&self) -> bool {
        self.remaining() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_has_limit_text() {
        let result = PipelineResult::Denied { remaining: 0 };
        assert_eq!(result.message(), LIMIT_REACHED_MESSAGE);
        assert!(!result.can_query());
    }

    #[test]
    fn test_pipeline_result_tagged_json() {
        let result = PipelineResult::Answered {
            text: "Use a min-heap.".to_string(),
            remaining: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "answered");
        assert_eq!(json["text"], "Use a min-heap.");
        assert_eq!(json["remaining"], 3);
    }

    #[test]
    fn test_exchange_turns() {
        assert!(ChatExchange::user("hi").is_user_turn);
        assert!(!ChatExchange::assistant("hello").is_user_turn);
    }
}
