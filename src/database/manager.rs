use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::Store;

/// Errors raised by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for {0}")]
    UniqueViolation(String),

    /// The referenced `owner` or `project` row no longer exists.
    #[error("Referenced {0} does not exist")]
    MissingParent(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Which store implementation a connection string selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

/// Opens the configured store and prepares its schema
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to the store named by `config.url`, running migrations for PostgreSQL.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match Self::backend(&config.url)? {
            Backend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                Ok(Arc::new(MemoryStore::new()))
            }
            Backend::Postgres => {
                let pool = Self::pool(config).await?;
                Self::migrate(&pool).await?;
                Ok(Arc::new(PgStore::new(pool)))
            }
        }
    }

    /// Build a PostgreSQL pool sized from configuration
    pub async fn pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Connected to database: {}", Self::redacted(&config.url)?);
        Ok(pool)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn backend(database_url: &str) -> Result<Backend, DatabaseError> {
        let url = url::Url::parse(database_url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;

        match url.scheme() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            other => Err(DatabaseError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Connection string with the password stripped, safe for logs
    fn redacted(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        if url.password().is_some() {
            // Only fails for cannot-be-a-base URLs, which never reach here.
            let _ = url.set_password(Some("****"));
        }
        Ok(url.into())
    }
}
