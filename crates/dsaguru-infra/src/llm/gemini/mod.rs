//! Google Gemini LLM provider.
//!
//! [`GeminiProvider`] implements the
//! [`LlmProvider`](dsaguru_core::llm::provider::LlmProvider) trait against the
//! native `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
