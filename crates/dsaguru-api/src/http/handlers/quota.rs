//! Quota status handler.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::http::extractors::user::UserId;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Quota view returned to the chat client.
#[derive(Debug, Serialize)]
pub struct QuotaBody {
    pub can_query: bool,
    pub remaining: u32,
    pub max_daily: u32,
}

/// GET /api/v1/quota - Remaining questions for the caller today.
///
/// Never charges quota. A first-time or corrupt record is initialized to a
/// zero count for today; a store outage reports the full allowance.
pub async fn get_quota(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Json<ApiResponse<QuotaBody>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let snapshot = state.pipeline.check_admission(&user_id).await;
    let body = QuotaBody {
        can_query: snapshot.can_query,
        remaining: snapshot.remaining,
        max_daily: state.max_daily(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(body, request_id, elapsed).with_link("self", "/api/v1/quota"))
}
