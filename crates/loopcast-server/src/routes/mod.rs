//! Route handlers.

pub mod manifest;

use axum::Json;
use serde_json::json;

use crate::error::AppError;

/// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for any path outside the manifest routing scheme.
pub async fn not_found() -> AppError {
    loopcast_core::Error::malformed("unrecognized path").into()
}
