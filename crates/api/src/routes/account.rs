//! Routes for the logged-in account.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use super::auth::AccountResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

/// Request body for a password change.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 256, message = "new_password is required"))]
    pub new_password: String,
}

/// Current account.
///
/// GET /api/v1/account
pub async fn current_account(session: CurrentSession) -> Json<AccountResponse> {
    Json(AccountResponse::from(&session.account))
}

/// Change the password. Other sessions of the account are ended.
///
/// POST /api/v1/account/change-password
pub async fn change_password(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    state
        .auth
        .change_password(&session, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
