//! Account repository for database operations.

use std::collections::HashSet;

use domain::models::{Account, NewAccount};
use domain::services::{AccountStore, StoreError};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{is_unique_violation, unavailable};
use crate::entities::{AccountEntity, AccountRoleDb};
use crate::metrics::QueryTimer;

/// Repository for account-related database operations.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Creates a new AccountRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_id");
        let result = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, password_hash, display_name, role, cohort, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an account by its (normalized) username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_username");
        let result = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, password_hash, display_name, role, cohort, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace an account's password hash.
    ///
    /// Returns true if the account exists.
    pub async fn update_password(
        &self,
        account_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_account_password");
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $1
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}

/// Inserts an account using any executor, so the registration transaction can share it.
pub(crate) async fn insert_account<'e, E>(
    executor: E,
    account: &NewAccount,
) -> Result<AccountEntity, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, AccountEntity>(
        r#"
        INSERT INTO accounts (username, password_hash, display_name, role, cohort)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, password_hash, display_name, role, cohort, created_at
        "#,
    )
    .bind(&account.username)
    .bind(&account.password_hash)
    .bind(&account.display_name)
    .bind(AccountRoleDb::from(account.role))
    .bind(account.cohort)
    .fetch_one(executor)
    .await
}

#[async_trait::async_trait]
impl AccountStore for AccountRepository {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("account_username_exists");
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .map_err(unavailable)?;
        timer.record();
        Ok(exists)
    }

    async fn anonymous_usernames_in_use(&self) -> Result<HashSet<String>, StoreError> {
        let timer = QueryTimer::new("list_reader_usernames");
        let names: Vec<String> =
            sqlx::query_scalar("SELECT username FROM accounts WHERE role = $1")
                .bind(AccountRoleDb::Reader)
                .fetch_all(&self.pool)
                .await
                .map_err(unavailable)?;
        timer.record();
        Ok(names.into_iter().collect())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let timer = QueryTimer::new("create_account");
        let result = insert_account(&self.pool, &account).await;
        timer.record();

        match result {
            Ok(entity) => Ok(entity.into()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::UsernameTaken),
            Err(err) => Err(unavailable(err)),
        }
    }
}
