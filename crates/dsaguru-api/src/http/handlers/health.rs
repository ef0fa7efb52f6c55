//! Liveness probe.

use axum::Json;
use serde_json::{Value, json};

/// GET /health - Liveness check. Touches no storage.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
