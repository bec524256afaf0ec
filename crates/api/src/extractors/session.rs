//! Session extractor.
//!
//! Gives handlers the authenticated session and account.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::ops::Deref;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::AuthenticatedSession;

/// The caller's session.
///
/// Routes behind [`require_session`](crate::middleware::require_session) find
/// the session in request extensions. Elsewhere the session cookie is
/// resolved directly.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthenticatedSession);

impl Deref for CurrentSession {
    type Target = AuthenticatedSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AuthenticatedSession>() {
            return Ok(CurrentSession(session.clone()));
        }

        let secret = state
            .cookies
            .extract_session(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Not logged in".to_string()))?;

        let session = state.auth.authenticate(secret).await?;
        Ok(CurrentSession(session))
    }
}
