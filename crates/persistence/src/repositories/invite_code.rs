//! Repository for invite code database operations.

use std::collections::HashSet;

use domain::models::{InviteCode, NewInviteCode};
use domain::services::{InviteCodeStore, StoreError};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{is_unique_violation, unavailable};
use crate::entities::invite_code::{invite_role_to_db, token_to_db};
use crate::entities::InviteCodeEntity;
use crate::metrics::QueryTimer;

/// One multi-row INSERT for the whole batch, so it lands or fails as a unit.
fn insert_statement(records: &[NewInviteCode]) -> QueryBuilder<'_, Postgres> {
    let mut builder =
        QueryBuilder::new("INSERT INTO invite_codes (token, recipient_name, role, cohort) ");
    builder.push_values(records, |mut row, record| {
        row.push_bind(token_to_db(record.token))
            .push_bind(&record.recipient_name)
            .push_bind(invite_role_to_db(record.role))
            .push_bind(record.cohort);
    });
    builder
}

/// Repository for invite code operations.
#[derive(Clone)]
pub struct InviteCodeRepository {
    pool: PgPool,
}

impl InviteCodeRepository {
    /// Creates a new invite code repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InviteCodeStore for InviteCodeRepository {
    async fn all_tokens(&self) -> Result<HashSet<u64>, StoreError> {
        let timer = QueryTimer::new("list_invite_tokens");
        let rows: Vec<String> = sqlx::query_scalar("SELECT token FROM invite_codes")
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        timer.record();

        rows.iter()
            .map(|token| {
                token.parse::<u64>().map_err(|_| {
                    StoreError::Unavailable(format!("Malformed invite token in storage: {}", token))
                })
            })
            .collect()
    }

    async fn insert_many(&self, records: &[NewInviteCode]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let timer = QueryTimer::new("insert_invite_codes");
        insert_statement(records)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateToken
                } else {
                    unavailable(err)
                }
            })?;
        timer.record();
        Ok(())
    }

    async fn find_by_token(&self, token: u64) -> Result<Option<InviteCode>, StoreError> {
        let timer = QueryTimer::new("find_invite_code_by_token");
        let entity = sqlx::query_as::<_, InviteCodeEntity>(
            r#"
            SELECT token, recipient_name, role, cohort, used, created_at
            FROM invite_codes
            WHERE token = $1
            "#,
        )
        .bind(token_to_db(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;
        timer.record();

        entity
            .map(InviteCode::try_from)
            .transpose()
            .map_err(StoreError::Unavailable)
    }

    async fn mark_used_if_unused(&self, token: u64) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("mark_invite_code_used");
        let result = sqlx::query(
            r#"
            UPDATE invite_codes
            SET used = true
            WHERE token = $1 AND used = false
            "#,
        )
        .bind(token_to_db(token))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
