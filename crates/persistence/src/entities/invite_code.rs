//! Invite code entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{InviteCode, InviteRole};
use sqlx::FromRow;

use super::account::AccountRoleDb;

/// Database row mapping for the invite_codes table.
///
/// `token` holds the decimal form of the integer token.
#[derive(Debug, Clone, FromRow)]
pub struct InviteCodeEntity {
    pub token: String,
    pub recipient_name: String,
    pub role: AccountRoleDb,
    pub cohort: i32,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

/// Column representation of a token.
pub fn token_to_db(token: u64) -> String {
    token.to_string()
}

/// Role column value for an invite role.
pub fn invite_role_to_db(role: InviteRole) -> AccountRoleDb {
    role.account_role().into()
}

impl TryFrom<InviteCodeEntity> for InviteCode {
    type Error = String;

    fn try_from(entity: InviteCodeEntity) -> Result<Self, Self::Error> {
        let token = entity
            .token
            .parse::<u64>()
            .map_err(|_| format!("Malformed invite token in storage: {}", entity.token))?;

        let role = match entity.role {
            AccountRoleDb::User => InviteRole::Ordinary,
            AccountRoleDb::Reader => InviteRole::AnonymousReader,
            AccountRoleDb::Admin => {
                return Err(format!("Invite {} carries the admin role", entity.token))
            }
        };

        Ok(Self {
            token,
            recipient_name: entity.recipient_name,
            role,
            cohort: entity.cohort,
            used: entity.used,
            created_at: entity.created_at,
        })
    }
}
