//! HTTP route handlers.

pub mod account;
pub mod auth;
pub mod codes;
pub mod health;
