// handlers/public/system.rs - banner, health check and unknown-route fallback

use axum::{extract::State, http::Uri, Json};
use serde_json::{json, Value};

use crate::database::repository::Store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Pro-Tasker API running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - 503 when the store does not answer
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.store.ping().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(ApiResponse::success(json!({ "message": "OK", "database": "ok" })))
}

/// Fallback for every unmatched route
pub async fn not_found(uri: Uri) -> ApiError {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    ApiError::not_found(format!("Not Found: {}", target))
}
