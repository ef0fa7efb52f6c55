//! Shared domain types for DSA Guru.
//!
//! This crate contains the core domain types used across the workspace:
//! quota records and snapshots, pipeline results, LLM request/response
//! shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod quota;
