//! Infrastructure layer for DSA Guru.
//!
//! Contains implementations of the ports defined in `dsaguru-core`: the
//! SQLite quota store, the Gemini and OpenAI-compatible LLM providers, and
//! loading of `config.toml` and the API key from the environment.

pub mod config;
pub mod llm;
pub mod sqlite;
