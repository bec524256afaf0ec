//! Transactional invite redemption.

use domain::models::{Account, NewAccount};
use domain::services::{RegistrationStore, StoreError};
use sqlx::PgPool;
use tracing::debug;

use super::account::insert_account;
use super::{is_unique_violation, unavailable};
use crate::entities::invite_code::token_to_db;
use crate::metrics::QueryTimer;

/// Consumes invite codes and creates accounts in one transaction.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new registration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RegistrationStore for RegistrationRepository {
    async fn redeem_invite(&self, token: u64, account: NewAccount) -> Result<Account, StoreError> {
        let timer = QueryTimer::new("redeem_invite");
        let token = token_to_db(token);
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        // Row lock: a concurrent redeemer blocks here, then sees used = true.
        let claimed = sqlx::query(
            r#"
            UPDATE invite_codes
            SET used = true
            WHERE token = $1 AND used = false
            "#,
        )
        .bind(&token)
        .execute(&mut *tx)
        .await
        .map_err(unavailable)?;

        if claimed.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invite_codes WHERE token = $1)")
                    .bind(&token)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(unavailable)?;
            tx.rollback().await.map_err(unavailable)?;
            debug!(token = %token, exists, "Invite code could not be claimed");
            return Err(if exists {
                StoreError::CodeAlreadyUsed
            } else {
                StoreError::CodeNotFound
            });
        }

        let created = match insert_account(&mut *tx, &account).await {
            Ok(entity) => entity,
            Err(err) => {
                tx.rollback().await.map_err(unavailable)?;
                return Err(if is_unique_violation(&err) {
                    StoreError::UsernameTaken
                } else {
                    unavailable(err)
                });
            }
        };

        tx.commit().await.map_err(unavailable)?;
        timer.record();
        Ok(created.into())
    }
}
