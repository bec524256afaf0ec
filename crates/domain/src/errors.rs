//! Domain error taxonomy for invite issuance and redemption.

use shared::codec::TokenCodecError;
use shared::password::PasswordError;
use thiserror::Error;

use crate::services::store::StoreError;

/// Errors surfaced by the invite services.
///
/// Every variant carries a stable [`kind`](InviteError::kind) so the request
/// layer can pick a response without matching on message text.
#[derive(Debug, Error)]
pub enum InviteError {
    #[error("Only administrators can generate invite codes")]
    Forbidden,

    #[error("Invalid invite code: {0}")]
    InvalidCode(String),

    #[error("Invite code not found")]
    CodeNotFound,

    #[error("Invite code has already been used")]
    CodeAlreadyUsed,

    #[error("{0}")]
    UsernameInvalid(String),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Username is not one of the anonymous usernames")]
    UsernameNotReserved,

    #[error("Username is reserved for anonymous accounts")]
    UsernameReservedConflict,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InviteError {
    /// Machine-readable error code.
    pub fn kind(&self) -> &'static str {
        match self {
            InviteError::Forbidden => "forbidden",
            InviteError::InvalidCode(_) => "invalid_code",
            InviteError::CodeNotFound => "code_not_found",
            InviteError::CodeAlreadyUsed => "code_already_used",
            InviteError::UsernameInvalid(_) => "username_invalid",
            InviteError::UsernameTaken => "username_taken",
            InviteError::UsernameNotReserved => "username_not_reserved",
            InviteError::UsernameReservedConflict => "username_reserved_conflict",
            InviteError::WeakPassword(_) => "weak_password",
            InviteError::StoreUnavailable(_) => "store_unavailable",
            InviteError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for InviteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CodeAlreadyUsed => InviteError::CodeAlreadyUsed,
            StoreError::CodeNotFound => InviteError::CodeNotFound,
            StoreError::UsernameTaken => InviteError::UsernameTaken,
            // Only reachable when a concurrent batch inserted the same token
            // between our snapshot and our insert; the caller may retry.
            StoreError::DuplicateToken => {
                InviteError::StoreUnavailable("Invite token collided, please retry".to_string())
            }
            StoreError::Unavailable(msg) => InviteError::StoreUnavailable(msg),
        }
    }
}

impl From<TokenCodecError> for InviteError {
    fn from(err: TokenCodecError) -> Self {
        match err {
            TokenCodecError::InvalidCodeFormat(msg) => InviteError::InvalidCode(msg),
        }
    }
}

impl From<PasswordError> for InviteError {
    fn from(err: PasswordError) -> Self {
        InviteError::Internal(err.to_string())
    }
}
