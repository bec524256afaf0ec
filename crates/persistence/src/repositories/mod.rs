//! Repository implementations for database operations.

pub mod account;
pub mod invite_code;
pub mod registration;
pub mod session;

pub use account::AccountRepository;
pub use invite_code::InviteCodeRepository;
pub use registration::RegistrationRepository;
pub use session::SessionRepository;

use domain::services::StoreError;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Maps a database failure the caller cannot act on to `StoreError::Unavailable`.
pub(crate) fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database operation failed");
    StoreError::Unavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_unavailable_keeps_message() {
        match unavailable(sqlx::Error::PoolTimedOut) {
            StoreError::Unavailable(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }
}
