//! Keyword-based topic classification.
//!
//! A question is in scope when it contains any vocabulary term as a
//! case-insensitive substring, or when one of its words is a configured
//! interrogative ("what", "explain", "implement", ...). Words are runs of
//! letters, digits, and apostrophes, so a contraction such as "what's" is its
//! own word and does not match "what".
//!
//! This is deliberately approximate. False positives only cost one LLM call,
//! and the system instruction tells the model to turn away anything that
//! slips through.

use dsaguru_types::config::TopicConfig;
use serde::{Deserialize, Serialize};

/// Outcome of classifying a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicClass {
    InScope,
    OutOfScope,
}

/// Pure classifier over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct TopicRouter {
    vocabulary: Vec<String>,
    interrogatives: Vec<String>,
    refusal_message: String,
}

impl TopicRouter {
    /// Build a router. Terms are lowercased; blank terms are dropped.
    pub fn new<V, I>(vocabulary: V, interrogatives: I, refusal_message: impl Into<String>) -> Self
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            vocabulary: normalize_terms(vocabulary),
            interrogatives: normalize_terms(interrogatives),
            refusal_message: refusal_message.into(),
        }
    }

    pub fn from_config(config: &TopicConfig) -> Self {
        Self::new(
            &config.vocabulary,
            &config.interrogatives,
            config.refusal_message.clone(),
        )
    }

    /// Text returned for out-of-scope questions.
    pub fn refusal_message(&self) -> &str {
        &self.refusal_message
    }

    pub fn classify(&self, question: &str) -> TopicClass {
        let lowered = question.to_lowercase();

        if self.vocabulary.iter().any(|term| lowered.contains(term.as_str())) {
            return TopicClass::InScope;
        }

        let has_interrogative = words(&lowered)
            .any(|word| self.interrogatives.iter().any(|i| i == word));
        if has_interrogative {
            TopicClass::InScope
        } else {
            TopicClass::OutOfScope
        }
    }
}

impl Default for TopicRouter {
    fn default() -> Self {
        Self::from_config(&TopicConfig::default())
    }
}

fn normalize_terms<T>(terms: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_binary_search_is_in_scope() {
        let router = TopicRouter::default();
        assert_eq!(router.classify("Explain binary search"), TopicClass::InScope);
    }

    #[test]
    fn weather_is_out_of_scope() {
        let router = TopicRouter::default();
        assert_eq!(router.classify("What's the weather today?"), TopicClass::OutOfScope);
        assert_eq!(
            router.classify("Who won the cricket match yesterday?"),
            TopicClass::OutOfScope
        );
    }

    #[test]
    fn vocabulary_matches_case_insensitive_substrings() {
        let router = TopicRouter::default();
        assert_eq!(router.classify("LINKED LISTS vs arrays?"), TopicClass::InScope);
        assert_eq!(router.classify("heapify kaise karte hain"), TopicClass::InScope);
    }

    #[test]
    fn interrogative_must_be_a_whole_word() {
        let router = TopicRouter::new(["trie"], ["how"], "no");
        assert_eq!(router.classify("How do I reverse this?"), TopicClass::InScope);
        // "show" contains "how" but is a different word
        assert_eq!(router.classify("show me a movie"), TopicClass::OutOfScope);
    }

    #[test]
    fn custom_vocabulary_replaces_default() {
        let router = TopicRouter::new(["Segment Tree", "  "], Vec::<String>::new(), "Only trees!");
        assert_eq!(router.classify("lazy propagation in a segment tree"), TopicClass::InScope);
        assert_eq!(router.classify("Explain binary search"), TopicClass::OutOfScope);
        assert_eq!(router.refusal_message(), "Only trees!");
    }

    #[test]
    fn empty_question_is_out_of_scope() {
        let router = TopicRouter::default();
        assert_eq!(router.classify(""), TopicClass::OutOfScope);
    }
}
