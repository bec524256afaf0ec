//! Authentication service for login, sessions and password changes.

use chrono::{DateTime, Duration, Utc};
use domain::models::Account;
use persistence::repositories::{AccountRepository, SessionRepository};
use shared::crypto::{generate_session_secret, sha256_hex};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::{error_message, normalize_username, validate_password};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    Unauthorized,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::DatabaseError(e) => ApiError::from(e),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// A freshly opened session. `secret` goes into the cookie and nowhere else.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

/// An authenticated request's session and account.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub account: Account,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    sessions: SessionRepository,
    ttl: Duration,
}

impl AuthService {
    /// Creates a new AuthService with sessions lasting `ttl_secs`.
    pub fn new(pool: PgPool, ttl_secs: i64) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Verifies credentials and opens a session.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Account, IssuedSession), AuthError> {
        let username = normalize_username(username);
        let account: Account = self
            .accounts
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        let password = password.trim().to_string();
        let stored_hash = account.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AuthError::Internal(format!("Password check failed: {}", e)))??;
        if !is_valid {
            debug!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.start_session(account.id).await?;
        info!(account_id = %account.id, role = %account.role, "Logged in");
        Ok((account, session))
    }

    /// Opens a new session for an account.
    pub async fn start_session(&self, account_id: Uuid) -> Result<IssuedSession, AuthError> {
        let secret = generate_session_secret();
        let expires_at = Utc::now() + self.ttl;
        self.sessions
            .create(account_id, &sha256_hex(&secret), expires_at)
            .await?;
        Ok(IssuedSession { secret, expires_at })
    }

    /// Resolves a cookie secret to its session and account, sliding the expiry forward.
    pub async fn authenticate(&self, secret: &str) -> Result<AuthenticatedSession, AuthError> {
        let session = self
            .sessions
            .find_active_by_hash(&sha256_hex(secret))
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let account: Account = self
            .accounts
            .find_by_id(session.account_id)
            .await?
            .ok_or(AuthError::Unauthorized)?
            .into();

        let expires_at = Utc::now() + self.ttl;
        self.sessions.extend(session.id, expires_at).await?;

        Ok(AuthenticatedSession {
            session_id: session.id,
            expires_at,
            account,
        })
    }

    /// Ends a session.
    pub async fn logout(&self, session: &AuthenticatedSession) -> Result<(), AuthError> {
        self.sessions.delete(session.session_id).await?;
        info!(account_id = %session.account.id, "Logged out");
        Ok(())
    }

    /// Replaces the account's password and ends its other sessions.
    pub async fn change_password(
        &self,
        session: &AuthenticatedSession,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let new_password = new_password.trim().to_string();
        validate_password(&new_password).map_err(|e| AuthError::WeakPassword(error_message(&e)))?;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&new_password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))??;

        let account_id = session.account.id;
        if !self.accounts.update_password(account_id, &password_hash).await? {
            return Err(AuthError::Unauthorized);
        }
        let revoked = self
            .sessions
            .delete_others_for_account(account_id, session.session_id)
            .await?;

        info!(account_id = %account_id, revoked_sessions = revoked, "Password changed");
        Ok(())
    }
}
