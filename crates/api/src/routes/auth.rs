//! Authentication routes: login, logout and invite-code signup.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::models::{Account, AccountRole, InviteInspection, SignupRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::middleware::record_invite_redeemed;

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 256, message = "password is required"))]
    pub password: String,
}

/// Account information returned to its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: AccountRole,
    pub cohort: i32,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            cohort: account.cohort,
        }
    }
}

/// Log in with username and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AccountResponse>), ApiError> {
    request.validate()?;

    let (account, session) = state.auth.login(&request.username, &request.password).await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &session.secret);
    Ok((headers, Json(AccountResponse::from(&account))))
}

/// End the current session.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    state.auth.logout(&session).await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);
    Ok((StatusCode::NO_CONTENT, headers))
}

/// Look up an invite code before signing up.
///
/// GET /api/v1/auth/signup/:code
///
/// Anonymous reader codes also list the usernames still free to pick.
pub async fn inspect_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<InviteInspection>, ApiError> {
    let inspection = state.redemption.inspect(&code).await?;
    Ok(Json(inspection))
}

/// Register an account with an invite code and log it in.
///
/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AccountResponse>), ApiError> {
    request.validate()?;

    let account = state
        .redemption
        .redeem(&request.code, &request.username, &request.password)
        .await?;
    record_invite_redeemed(account.role.as_str());

    let session = state.auth.start_session(account.id).await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &session.secret);
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AccountResponse::from(&account)),
    ))
}
