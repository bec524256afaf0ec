//! Session repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

/// Repository for server-side session operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a session for an account.
    pub async fn create(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO sessions (account_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, token_hash, account_id, expires_at, created_at
            "#,
        )
        .bind(account_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an unexpired session by the digest of its secret.
    pub async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, token_hash, account_id, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Slide a session's expiry forward.
    pub async fn extend(&self, session_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("extend_session");
        sqlx::query(
            r#"
            UPDATE sessions
            SET expires_at = $1
            WHERE id = $2
            "#,
        )
        .bind(expires_at)
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Delete a session by ID.
    ///
    /// Returns true if a session was deleted.
    pub async fn delete(&self, session_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_session");
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session of an account except `keep`.
    pub async fn delete_others_for_account(
        &self,
        account_id: Uuid,
        keep: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_other_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE account_id = $1 AND id <> $2")
            .bind(account_id)
            .bind(keep)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete expired sessions.
    ///
    /// Returns the number of deleted sessions.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
