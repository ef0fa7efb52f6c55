//! Caller identity extractor.
//!
//! The upstream gateway authenticates the user and forwards their id in the
//! `X-User-Id` header. This service trusts that header and does no
//! authentication of its own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Longest accepted user id.
const MAX_USER_ID_LEN: usize = 256;

/// Authenticated caller id taken from `X-User-Id`.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            AppError::Unauthorized("Missing X-User-Id header".to_string())
        })?;

        let user_id = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-User-Id header encoding".to_string()))?
            .trim();

        if user_id.is_empty() {
            return Err(AppError::Unauthorized("Empty X-User-Id header".to_string()));
        }
        if user_id.len() > MAX_USER_ID_LEN {
            return Err(AppError::Unauthorized("X-User-Id header too long".to_string()));
        }

        Ok(UserId(user_id.to_string()))
    }
}
