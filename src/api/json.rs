//! Lenient JSON request bodies.
//!
//! Bodies are parsed regardless of `Content-Type`, and an empty body reads as
//! `{}` so endpoints with only optional fields accept bare requests. Parse
//! failures become a 400 with a `{message}` body instead of axum's plain-text
//! rejection.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::error::ApiError;

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(ApiJson)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }
}

/// Parse a due date: RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// `null`, absent or `""` mean no date.
pub fn nullable_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_due_date(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid dueDate `{}`", s))),
    }
}

/// For partial updates: absent stays `None` (via `#[serde(default)]`), while a
/// present key yields `Some`, with `null` or `""` clearing the date.
pub fn patch_date<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    nullable_date(deserializer).map(Some)
}
