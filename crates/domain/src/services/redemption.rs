//! Invite code inspection and redemption.

use std::sync::Arc;

use shared::codec::parse_display_code;
use shared::password::hash_password;
use shared::validation::{error_message, normalize_username, validate_password, validate_username};
use tracing::{debug, info};

use super::anonymous_pool::{available_names, is_reserved_name};
use super::store::{AccountStore, InviteCodeStore, RegistrationStore};
use crate::errors::InviteError;
use crate::models::{Account, InviteCode, InviteInspection, InviteRole, NewAccount};

/// Validates invite codes and turns them into accounts.
#[derive(Clone)]
pub struct InviteRedemptionService {
    invites: Arc<dyn InviteCodeStore>,
    accounts: Arc<dyn AccountStore>,
    registrations: Arc<dyn RegistrationStore>,
}

impl InviteRedemptionService {
    /// Creates a new redemption service from its store collaborators.
    pub fn new(
        invites: Arc<dyn InviteCodeStore>,
        accounts: Arc<dyn AccountStore>,
        registrations: Arc<dyn RegistrationStore>,
    ) -> Self {
        Self {
            invites,
            accounts,
            registrations,
        }
    }

    /// Tells a prospective registrant what a code grants.
    ///
    /// Anonymous-reader codes also list the reserved names that are free
    /// right now. That list is only a snapshot; `redeem` checks again.
    pub async fn inspect(&self, display_code: &str) -> Result<InviteInspection, InviteError> {
        let invite = self.load_unused(display_code).await?;

        let available = match invite.role {
            InviteRole::Ordinary => None,
            InviteRole::AnonymousReader => {
                let assigned = self.accounts.anonymous_usernames_in_use().await?;
                Some(available_names(&assigned))
            }
        };

        Ok(InviteInspection {
            role: invite.role,
            available_names: available,
        })
    }

    /// Registers an account with an invite code.
    ///
    /// Performs every check `inspect` does, validates the chosen username
    /// against the code's role, then consumes the code and creates the
    /// account in one atomic step. Of two concurrent redemptions of the same
    /// code exactly one succeeds; the other fails with `CodeAlreadyUsed`.
    pub async fn redeem(
        &self,
        display_code: &str,
        username: &str,
        password: &str,
    ) -> Result<Account, InviteError> {
        let invite = self.load_unused(display_code).await?;

        let username = normalize_username(username);
        validate_username(&username)
            .map_err(|e| InviteError::UsernameInvalid(error_message(&e)))?;

        match invite.role {
            InviteRole::AnonymousReader if !is_reserved_name(&username) => {
                return Err(InviteError::UsernameNotReserved);
            }
            InviteRole::Ordinary if is_reserved_name(&username) => {
                return Err(InviteError::UsernameReservedConflict);
            }
            _ => {}
        }

        if self.accounts.username_exists(&username).await? {
            return Err(InviteError::UsernameTaken);
        }

        let password = password.trim().to_string();
        validate_password(&password).map_err(|e| InviteError::WeakPassword(error_message(&e)))?;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| InviteError::Internal(format!("Password hashing task failed: {}", e)))??;

        let display_name = match invite.role {
            InviteRole::Ordinary => invite.recipient_name.clone(),
            InviteRole::AnonymousReader => username.clone(),
        };

        let account = self
            .registrations
            .redeem_invite(
                invite.token,
                NewAccount {
                    username,
                    password_hash,
                    display_name,
                    role: invite.role.account_role(),
                    cohort: invite.cohort,
                },
            )
            .await?;

        info!(
            account_id = %account.id,
            role = %account.role,
            cohort = account.cohort,
            "Invite code redeemed"
        );

        Ok(account)
    }

    /// Decodes, looks up and checks that a code is still unused.
    async fn load_unused(&self, display_code: &str) -> Result<InviteCode, InviteError> {
        let token = parse_display_code(display_code)?;

        let invite = self
            .invites
            .find_by_token(token)
            .await?
            .ok_or(InviteError::CodeNotFound)?;

        if invite.used {
            debug!(token = token, "Rejected already used invite code");
            return Err(InviteError::CodeAlreadyUsed);
        }

        Ok(invite)
    }
}
