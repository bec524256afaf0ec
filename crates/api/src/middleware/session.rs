//! Session authentication middleware.
//!
//! Resolves the session cookie to an account and renews the session on every
//! authenticated request.

use axum::{
    body::Body,
    extract::State,
    http::{header::SET_COOKIE, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::AuthError;

/// Middleware that requires a valid session.
///
/// The resolved [`AuthenticatedSession`](crate::services::AuthenticatedSession)
/// is stored in request extensions for downstream handlers. Unless the handler
/// set its own cookie, the response refreshes the cookie lifetime to match the
/// renewed session.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let secret = match state.cookies.extract_session(req.headers()) {
        Some(secret) => secret.to_string(),
        None => return ApiError::Unauthorized("Not logged in".to_string()).into_response(),
    };

    let session = match state.auth.authenticate(&secret).await {
        Ok(session) => session,
        Err(AuthError::Unauthorized) => {
            let mut response = ApiError::from(AuthError::Unauthorized).into_response();
            state.cookies.add_clear_cookie(response.headers_mut());
            return response;
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    tracing::debug!(account_id = %session.account.id, "Session authenticated");
    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;
    if !response.headers().contains_key(SET_COOKIE) {
        state
            .cookies
            .add_session_cookie(response.headers_mut(), &secret);
    }
    response
}
