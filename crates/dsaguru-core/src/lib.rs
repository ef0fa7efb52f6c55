//! Business logic and port trait definitions for DSA Guru.
//!
//! This crate defines the "ports" (`QuotaStore`, `LlmProvider`, `Clock`) that
//! the infrastructure layer implements, and the quota-gated question pipeline
//! built on top of them. It depends only on `dsaguru-types` -- never on
//! `dsaguru-infra` or any database/HTTP crate.

pub mod clock;
pub mod llm;
pub mod pipeline;
pub mod quota;
pub mod topic;
