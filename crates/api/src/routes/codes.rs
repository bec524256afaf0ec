//! Invite code issuance routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{IssueInvitesRequest, IssueInvitesResponse, Requester};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::middleware::record_invites_issued;

/// Rejects batches over the configured maximum.
fn check_batch_size(request: &IssueInvitesRequest, max: usize) -> Result<(), ApiError> {
    if request.users.len() > max {
        return Err(ApiError::Validation(format!(
            "At most {} invitees per request",
            max
        )));
    }
    Ok(())
}

/// Issue invite codes for the caller's cohort.
///
/// POST /api/v1/codes
///
/// Codes are returned in the order of `users`. Anonymous invitees are listed
/// under the anonymized name, not the submitted one.
pub async fn issue_codes(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<IssueInvitesRequest>,
) -> Result<(StatusCode, Json<IssueInvitesResponse>), ApiError> {
    request.validate()?;
    check_batch_size(&request, state.config.limits.max_invite_batch_size)?;

    let requester = Requester::from(&session.account);
    let invites = state.issuance.issue(&requester, &request.users).await?;

    let anonymous = request.users.iter().filter(|u| u.is_anonymous).count();
    record_invites_issued(invites.len(), anonymous);

    Ok((StatusCode::CREATED, Json(IssueInvitesResponse { invites })))
}
