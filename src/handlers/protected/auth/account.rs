// handlers/protected/auth/account.rs - DELETE /api/auth/me handler

use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /api/auth/me - remove the caller's account, projects and tasks
pub async fn me_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Value> {
    state.accounts().delete_account(auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "message": "Account deleted" })))
}
