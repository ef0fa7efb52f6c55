//! Question handler: runs one question through the quota-gated pipeline.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use dsaguru_core::pipeline::RequestContext;
use dsaguru_types::chat::PipelineResult;

use crate::http::error::AppError;
use crate::http::extractors::user::UserId;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// POST /api/v1/questions - Ask the DSA tutor a question.
///
/// Denied, refused, and answered outcomes all return 200; the `outcome`
/// field tells them apart. Only malformed input is an error, and every
/// error is returned in the envelope format.
pub async fn ask_question(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PipelineResult>>, AppError> {
    let start = Instant::now();
    let Json(body) = payload?;
    let ctx = RequestContext::new(user_id);

    let result = state
        .pipeline
        .handle_question(&ctx, &body.question)
        .await
        .map_err(|e| AppError::pipeline(e, ctx.request_id))?;

    tracing::info!(
        request_id = %ctx.request_id,
        remaining = result.remaining(),
        "question handled"
    );

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(result, ctx.request_id.to_string(), elapsed)
        .with_link("quota", "/api/v1/quota");
    Ok(Json(resp))
}
