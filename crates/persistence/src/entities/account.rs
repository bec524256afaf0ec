//! Account entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Account, AccountRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for account_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
pub enum AccountRoleDb {
    Admin,
    User,
    Reader,
}

impl From<AccountRoleDb> for AccountRole {
    fn from(db_role: AccountRoleDb) -> Self {
        match db_role {
            AccountRoleDb::Admin => AccountRole::Admin,
            AccountRoleDb::User => AccountRole::User,
            AccountRoleDb::Reader => AccountRole::Reader,
        }
    }
}

impl From<AccountRole> for AccountRoleDb {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::Admin => AccountRoleDb::Admin,
            AccountRole::User => AccountRoleDb::User,
            AccountRole::Reader => AccountRoleDb::Reader,
        }
    }
}

/// Database row mapping for the accounts table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEntity {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: AccountRoleDb,
    pub cohort: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AccountEntity> for Account {
    fn from(entity: AccountEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            display_name: entity.display_name,
            role: entity.role.into(),
            cohort: entity.cohort,
            created_at: entity.created_at,
        }
    }
}
