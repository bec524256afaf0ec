//! Admin bootstrap for initial setup.
//!
//! Creates the first administrator on startup if configured, so a fresh
//! install can issue invite codes. Idempotent: an existing account with the
//! configured username is left untouched.

use domain::models::{AccountRole, NewAccount};
use domain::services::{is_reserved_name, AccountStore, StoreError};
use persistence::repositories::AccountRepository;
use shared::password::{hash_password, PasswordError};
use shared::validation::{error_message, normalize_username, validate_password, validate_username};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Validated bootstrap credentials.
#[derive(Debug, PartialEq, Eq)]
struct BootstrapAdmin {
    username: String,
    password: String,
    cohort: i32,
}

/// Checks the bootstrap settings; `None` means bootstrap is not configured.
fn bootstrap_admin_from(config: &BootstrapConfig) -> Result<Option<BootstrapAdmin>, BootstrapError> {
    if config.admin_username.trim().is_empty() {
        return Ok(None);
    }

    if config.admin_password.trim().is_empty() {
        warn!(
            "GOSSIP__BOOTSTRAP__ADMIN_USERNAME is set but GOSSIP__BOOTSTRAP__ADMIN_PASSWORD is empty - skipping bootstrap"
        );
        return Ok(None);
    }

    let username = normalize_username(&config.admin_username);
    validate_username(&username).map_err(|e| BootstrapError::Config(error_message(&e)))?;
    if is_reserved_name(&username) {
        return Err(BootstrapError::Config(format!(
            "Admin username '{}' is reserved for anonymous readers",
            username
        )));
    }

    let password = config.admin_password.trim().to_string();
    validate_password(&password).map_err(|e| BootstrapError::Config(error_message(&e)))?;

    Ok(Some(BootstrapAdmin {
        username,
        password,
        cohort: config.admin_cohort,
    }))
}

/// Bootstrap the admin account if configured and not already done.
///
/// Call after migrations on startup.
pub async fn bootstrap_admin(pool: &PgPool, config: &BootstrapConfig) -> Result<(), BootstrapError> {
    let admin = match bootstrap_admin_from(config)? {
        Some(admin) => admin,
        None => return Ok(()),
    };

    let accounts = AccountRepository::new(pool.clone());
    if accounts.username_exists(&admin.username).await? {
        info!(username = %admin.username, "Bootstrap admin already exists - skipping bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let created = accounts
        .create_account(NewAccount {
            username: admin.username.clone(),
            password_hash,
            display_name: admin.username,
            role: AccountRole::Admin,
            cohort: admin.cohort,
        })
        .await;

    match created {
        Ok(account) => {
            info!(
                account_id = %account.id,
                username = %account.username,
                cohort = account.cohort,
                "Bootstrap admin created"
            );
            warn!(
                "SECURITY: Remove GOSSIP__BOOTSTRAP__ADMIN_PASSWORD from configuration after initial setup"
            );
            Ok(())
        }
        // Another instance won the race.
        Err(StoreError::UsernameTaken) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
