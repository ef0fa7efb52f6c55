//! Application error type mapping to HTTP status codes and envelope format.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use dsaguru_core::pipeline::PipelineError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Question rejected before reaching the quota gate.
    Pipeline {
        error: PipelineError,
        request_id: Uuid,
    },
    /// Missing or unusable caller identity.
    Unauthorized(String),
    /// Request body could not be decoded.
    InvalidBody { status: StatusCode, message: String },
}

impl AppError {
    /// Pipeline rejection tagged with the request it belongs to.
    pub fn pipeline(error: PipelineError, request_id: Uuid) -> Self {
        AppError::Pipeline { error, request_id }
    }

    fn request_id(&self) -> Uuid {
        match self {
            AppError::Pipeline { request_id, .. } => *request_id,
            _ => Uuid::now_v7(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = self.request_id();
        let (status, code, message) = match &self {
            AppError::Pipeline {
                error: PipelineError::EmptyQuestion,
                ..
            } => (
                StatusCode::BAD_REQUEST,
                "EMPTY_QUESTION",
                "Question must not be empty".to_string(),
            ),
            AppError::Pipeline {
                error: e @ PipelineError::QuestionTooLong { .. },
                ..
            } => (StatusCode::PAYLOAD_TOO_LARGE, "QUESTION_TOO_LONG", e.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::InvalidBody { status, message } => (*status, "INVALID_BODY", message.clone()),
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": request_id.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
