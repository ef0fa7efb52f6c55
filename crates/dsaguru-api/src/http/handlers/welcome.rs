//! Greeting shown when a chat view opens.

use axum::Json;
use serde::Serialize;

use dsaguru_types::chat::WELCOME_MESSAGE;

use crate::http::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct WelcomeBody {
    pub message: &'static str,
}

/// GET /api/v1/welcome - Static greeting. Never consumes quota.
pub async fn welcome() -> Json<ApiResponse<WelcomeBody>> {
    let request_id = uuid::Uuid::now_v7().to_string();
    let resp = ApiResponse::success(WelcomeBody { message: WELCOME_MESSAGE }, request_id, 0)
        .with_link("self", "/api/v1/welcome");
    Json(resp)
}
