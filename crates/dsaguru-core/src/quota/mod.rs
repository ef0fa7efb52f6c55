//! Daily question quota: the store port, an in-memory store, and the gate.
//!
//! Implementations of `QuotaStore` backed by real databases live in
//! dsaguru-infra.

pub mod gate;
pub mod memory;
pub mod store;
