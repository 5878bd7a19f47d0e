use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod password;

/// Fixed lifetime of an issued token
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Token payload. The subject is written as `userId`; `id` and `_id` are
/// still read so tokens minted by older clients keep working.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "id", default, skip_serializing)]
    pub legacy_id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing)]
    pub legacy_underscore_id: Option<String>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp();

        Self {
            user_id: Some(user_id.to_string()),
            legacy_id: None,
            legacy_underscore_id: None,
            exp,
            iat: now.timestamp(),
        }
    }

    /// First subject claim present, in the order `userId`, `id`, `_id`.
    pub fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.legacy_id.as_deref())
            .or(self.legacy_underscore_id.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Token payload missing userId")]
    Malformed,
}

/// Issues and verifies HS256 identity tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        encode(&Header::default(), &Claims::new(user_id), &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify signature and expiry, returning the subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;

        data.claims
            .subject()
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or(TokenError::Malformed)
    }
}
