//! Account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    /// Can issue invite codes for their cohort.
    Admin,
    /// Ordinary, named member.
    User,
    /// Anonymous reader whose username comes from the reserved pool.
    Reader,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "ADMIN",
            AccountRole::User => "USER",
            AccountRole::Reader => "READER",
        }
    }

    /// Returns true if this role may generate invite codes.
    pub fn can_issue_invites(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(AccountRole::Admin),
            "USER" => Ok(AccountRole::User),
            "READER" => Ok(AccountRole::Reader),
            _ => Err(format!("Invalid account role: {}", s)),
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub display_name: String,
    pub role: AccountRole,
    pub cohort: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for an account about to be created.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: AccountRole,
    pub cohort: i32,
}

/// The identity on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub role: AccountRole,
    pub cohort: i32,
}

impl From<&Account> for Requester {
    fn from(account: &Account) -> Self {
        Self {
            role: account.role,
            cohort: account.cohort,
        }
    }
}
