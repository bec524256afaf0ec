//! Invite code domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::codec::to_display_code;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::account::AccountRole;
use crate::services::anonymous_pool::ANONYMOUS_RECIPIENT_NAME;

/// Role granted by an invite code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InviteRole {
    /// Registers an ordinary, named account.
    #[serde(rename = "USER")]
    Ordinary,
    /// Registers an anonymous reader picking a name from the reserved pool.
    #[serde(rename = "READER")]
    AnonymousReader,
}

impl InviteRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteRole::Ordinary => "USER",
            InviteRole::AnonymousReader => "READER",
        }
    }

    /// The account role an account created from this invite receives.
    pub fn account_role(&self) -> AccountRole {
        match self {
            InviteRole::Ordinary => AccountRole::User,
            InviteRole::AnonymousReader => AccountRole::Reader,
        }
    }
}

impl FromStr for InviteRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(InviteRole::Ordinary),
            "READER" => Ok(InviteRole::AnonymousReader),
            _ => Err(format!("Invalid invite role: {}", s)),
        }
    }
}

impl fmt::Display for InviteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted invite code.
///
/// The display code is never stored; it is derived from `token` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCode {
    pub token: u64,
    pub recipient_name: String,
    pub role: InviteRole,
    pub cohort: i32,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    /// Human-facing form of the token.
    pub fn display_code(&self) -> String {
        to_display_code(self.token)
    }
}

/// An invite code about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInviteCode {
    pub token: u64,
    pub recipient_name: String,
    pub role: InviteRole,
    pub cohort: i32,
}

impl NewInviteCode {
    /// Builds the record for one invitee.
    ///
    /// Anonymous invitees get the sentinel recipient name; their submitted
    /// name is dropped here and never reaches storage.
    pub fn for_invitee(token: u64, invitee: &Invitee, cohort: i32) -> Self {
        let (recipient_name, role) = if invitee.is_anonymous {
            (ANONYMOUS_RECIPIENT_NAME.to_string(), InviteRole::AnonymousReader)
        } else {
            (invitee.name.trim().to_string(), InviteRole::Ordinary)
        };

        Self {
            token,
            recipient_name,
            role,
            cohort,
        }
    }
}

/// One person to invite.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct Invitee {
    #[validate(
        length(min = 1, max = 100, message = "name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(alias = "is_anon", default)]
    pub is_anonymous: bool,
}

impl Invitee {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_anonymous: false,
        }
    }

    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_anonymous: true,
        }
    }
}

/// Names are stored trimmed, so whitespace alone counts as empty.
fn validate_not_blank(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank_name");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Request to issue a batch of invite codes.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct IssueInvitesRequest {
    #[validate(length(min = 1, message = "at least one invitee is required"))]
    #[validate(nested)]
    pub users: Vec<Invitee>,
}

/// An issued code, in the same position as its invitee in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IssuedInvite {
    pub code: String,
    pub name: String,
}

/// Response after issuing invite codes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IssueInvitesResponse {
    pub invites: Vec<IssuedInvite>,
}

/// What a prospective registrant learns about a code before signing up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteInspection {
    pub role: InviteRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_names: Option<Vec<String>>,
}

/// Request to register an account with an invite code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupRequest {
    /// Display code, e.g. `0A1B-2C3D`.
    #[serde(alias = "token")]
    #[validate(length(min = 1, max = 32, message = "code must be between 1 and 32 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 64, message = "username must be between 1 and 64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 256, message = "password must be between 1 and 256 characters"))]
    pub password: String,
}
