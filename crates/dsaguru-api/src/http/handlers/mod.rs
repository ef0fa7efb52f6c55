//! REST API handler modules.

pub mod health;
pub mod question;
pub mod quota;
pub mod welcome;
