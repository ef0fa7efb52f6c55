//! HTTP/REST API layer for DSA Guru.
//!
//! Axum-based REST API at `/api/v1/` with envelope responses and CORS. The
//! caller's identity arrives in the `X-User-Id` header set by the gateway.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
