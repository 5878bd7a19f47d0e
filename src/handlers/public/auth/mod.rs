// handlers/public/auth/mod.rs - Token acquisition endpoints
use serde::Serialize;

use crate::database::models::UserInfo;
use crate::services::Session;

pub mod login; // POST /api/auth/login
pub mod register; // POST /api/auth/register

pub use login::login_post;
pub use register::register_post;

/// Body returned by both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserInfo,
}

impl AuthResponse {
    fn new(message: &'static str, session: Session) -> Self {
        Self {
            message,
            user: UserInfo::from(&session.user),
            token: session.token,
        }
    }
}
