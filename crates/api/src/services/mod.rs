//! Request-layer services.

pub mod admin_bootstrap;
pub mod auth;
pub mod cookies;

pub use auth::{AuthError, AuthService, AuthenticatedSession, IssuedSession};
pub use cookies::CookieHelper;
