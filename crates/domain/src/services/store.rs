//! Store collaborators used by the invite services.
//!
//! The services never talk to a database directly; they receive these traits
//! at construction time. The persistence crate implements them on top of
//! PostgreSQL and [`InMemoryStore`](super::memory::InMemoryStore) implements
//! them for development and tests.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Account, InviteCode, NewAccount, NewInviteCode};

/// Errors reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invite token already exists")]
    DuplicateToken,

    #[error("Invite code already used")]
    CodeAlreadyUsed,

    #[error("Invite code not found")]
    CodeNotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence of invite codes.
#[async_trait::async_trait]
pub trait InviteCodeStore: Send + Sync {
    /// Every token ever issued, used or not.
    async fn all_tokens(&self) -> Result<HashSet<u64>, StoreError>;

    /// Inserts a batch of invite codes; all of them or none.
    ///
    /// Fails with [`StoreError::DuplicateToken`] on a token collision.
    async fn insert_many(&self, records: &[NewInviteCode]) -> Result<(), StoreError>;

    /// Looks up an invite code by token.
    async fn find_by_token(&self, token: u64) -> Result<Option<InviteCode>, StoreError>;

    /// Marks the code used if it is currently unused.
    ///
    /// Returns `true` only for the call that performed the transition.
    async fn mark_used_if_unused(&self, token: u64) -> Result<bool, StoreError>;
}

/// Persistence of accounts, as far as registration needs it.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns true if any account holds `username`.
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Usernames currently held by anonymous reader accounts.
    async fn anonymous_usernames_in_use(&self) -> Result<HashSet<String>, StoreError>;

    /// Creates an account; fails with [`StoreError::UsernameTaken`] on a duplicate.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;
}

/// The one critical section of registration.
#[async_trait::async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Consumes the invite and creates the account as a single atomic unit.
    ///
    /// Fails with [`StoreError::CodeAlreadyUsed`] if the code was consumed
    /// by anyone else first, and with [`StoreError::UsernameTaken`] if the
    /// username was claimed concurrently. On failure neither write is
    /// observable.
    async fn redeem_invite(&self, token: u64, account: NewAccount) -> Result<Account, StoreError>;
}
