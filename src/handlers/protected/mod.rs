// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, so handlers can take
// `Extension<AuthUser>` for granted. Record access goes through `crate::authz`.
pub mod auth;
pub mod projects;
pub mod tasks;

use crate::error::ApiError;

/// Trimmed value of a required text field, or a 400 carrying `message`.
fn required_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::validation_error(message)),
    }
}

/// Like `required_text` for partial updates: absent is fine, blank is not.
fn optional_required_text(value: Option<String>, message: &str) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        some => required_text(some, message).map(Some),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}
