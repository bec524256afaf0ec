//! Invite code issuance.

use std::sync::Arc;

use shared::codec::to_display_code;
use shared::token::{generate_token, INVITE_TOKEN_BYTES};
use tracing::info;

use super::store::InviteCodeStore;
use crate::errors::InviteError;
use crate::models::{InviteRole, Invitee, IssuedInvite, NewInviteCode, Requester};

/// Mints batches of invite codes on behalf of administrators.
#[derive(Clone)]
pub struct InviteIssuanceService {
    invites: Arc<dyn InviteCodeStore>,
}

impl InviteIssuanceService {
    /// Creates a new issuance service backed by the given invite store.
    pub fn new(invites: Arc<dyn InviteCodeStore>) -> Self {
        Self { invites }
    }

    /// Issues one invite code per invitee.
    ///
    /// Existing tokens are loaded once per batch. Every freshly drawn token is
    /// added to that in-memory set straight away, so invitees of the same
    /// batch never collide with each other. The returned codes are in the same
    /// order as `invitees` and describe exactly what was persisted.
    pub async fn issue(
        &self,
        requester: &Requester,
        invitees: &[Invitee],
    ) -> Result<Vec<IssuedInvite>, InviteError> {
        if !requester.role.can_issue_invites() {
            return Err(InviteError::Forbidden);
        }

        if invitees.is_empty() {
            return Ok(Vec::new());
        }

        let mut taken = self.invites.all_tokens().await?;

        let records: Vec<NewInviteCode> = invitees
            .iter()
            .map(|invitee| {
                let token = generate_token(&taken, INVITE_TOKEN_BYTES);
                taken.insert(token);
                NewInviteCode::for_invitee(token, invitee, requester.cohort)
            })
            .collect();

        self.invites.insert_many(&records).await?;

        let anonymous = records
            .iter()
            .filter(|r| r.role == InviteRole::AnonymousReader)
            .count();
        info!(
            cohort = requester.cohort,
            issued = records.len(),
            anonymous = anonymous,
            "Invite codes issued"
        );

        Ok(records
            .into_iter()
            .map(|record| IssuedInvite {
                code: to_display_code(record.token),
                name: record.recipient_name,
            })
            .collect())
    }
}
