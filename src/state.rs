use std::sync::Arc;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::repository::Store;
use crate::services::AccountService;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Shared handles cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wrap an already opened store. Fails when the signing secret is empty.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, StartupError> {
        let tokens = TokenService::new(&config.security.jwt_secret)?;
        Ok(Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        })
    }

    /// Open the store named in the configuration and build state around it.
    pub async fn connect(config: AppConfig) -> Result<Self, StartupError> {
        let store = DatabaseManager::connect(&config.database).await?;
        Self::new(config, store)
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.store.clone(),
            self.tokens.clone(),
            self.config.security.bcrypt_cost,
        )
    }
}
