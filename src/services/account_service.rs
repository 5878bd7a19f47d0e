use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password, PasswordError, MIN_PASSWORD_LENGTH};
use crate::auth::{TokenError, TokenService};
use crate::database::manager::DatabaseError;
use crate::database::models::user::normalize_email;
use crate::database::models::{NewUser, User};
use crate::database::repository::{Store, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Lost the race against a concurrent registration
            DatabaseError::UniqueViolation(field) if field == "email" => AccountError::DuplicateEmail,
            other => AccountError::Database(other),
        }
    }
}

/// An authenticated user together with a freshly issued token
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Registration, login and self-deletion of accounts
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    /// Create an account and sign the new user in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AccountError> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "name, email, password are required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!("Registered user {}", user.id);
        let token = self.tokens.issue(user.id)?;
        Ok(Session { user, token })
    }

    /// Check credentials and issue a token. Unknown email and wrong password
    /// fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            tracing::debug!("Login failed: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::debug!("Login failed for user {}", user.id);
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(Session { user, token })
    }

    /// Delete the user along with every project and task they own.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AccountError> {
        if !self.store.delete_account(user_id).await? {
            return Err(AccountError::UserNotFound);
        }
        tracing::info!("Deleted account {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::NewProject;
    use crate::database::repository::ProjectRepository;

    fn service() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new("test-secret").unwrap());
        (AccountService::new(store.clone(), tokens, 4), store)
    }

    #[tokio::test]
    async fn register_normalizes_and_hashes() {
        let (accounts, _) = service();
        let session = accounts
            .register("  Ann  ", " Ann@Example.COM ", "secret1")
            .await
            .unwrap();

        assert_eq!(session.user.name, "Ann");
        assert_eq!(session.user.email, "ann@example.com");
        assert_ne!(session.user.password_hash, "secret1");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let (accounts, _) = service();
        for (name, email, password) in [("", "a@x.com", "secret1"), ("A", "  ", "secret1"), ("A", "a@x.com", "")] {
            let err = accounts.register(name, email, password).await.unwrap_err();
            assert!(
                matches!(&err, AccountError::Validation(m) if m == "name, email, password are required"),
                "{:?}",
                err
            );
        }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let (accounts, _) = service();
        let err = accounts.register("A", "a@x.com", "12345").await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_ignores_case() {
        let (accounts, _) = service();
        accounts.register("A", "a@x.com", "secret1").await.unwrap();
        let err = accounts.register("B", "A@X.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (accounts, _) = service();
        accounts.register("A", "a@x.com", "secret1").await.unwrap();

        let unknown = accounts.login("b@x.com", "secret1").await.unwrap_err();
        let wrong = accounts.login("a@x.com", "secret2").await.unwrap_err();
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn login_accepts_mixed_case_email() {
        let (accounts, _) = service();
        let registered = accounts.register("A", "a@x.com", "secret1").await.unwrap();
        let session = accounts.login("A@X.COM", "secret1").await.unwrap();
        assert_eq!(session.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (accounts, _) = service();
        let err = accounts.login("", "secret1").await.unwrap_err();
        assert!(matches!(&err, AccountError::Validation(m) if m == "email and password are required"));
    }

    #[tokio::test]
    async fn delete_account_cascades_then_reports_missing() {
        let (accounts, store) = service();
        let session = accounts.register("A", "a@x.com", "secret1").await.unwrap();
        let project = store
            .create_project(NewProject {
                owner: session.user.id,
                name: "P1".into(),
                description: String::new(),
                priority: Default::default(),
                due_date: None,
            })
            .await
            .unwrap();

        accounts.delete_account(session.user.id).await.unwrap();
        assert!(store.find_project(project.id).await.unwrap().is_none());

        let err = accounts.delete_account(session.user.id).await.unwrap_err();
        assert!(matches!(err, AccountError::UserNotFound));
    }
}
