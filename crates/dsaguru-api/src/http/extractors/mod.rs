//! Custom axum extractors.

pub mod user;
