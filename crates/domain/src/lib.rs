//! Domain layer for the Gossip backend.
//!
//! This crate contains:
//! - Domain models (InviteCode, Account, roles)
//! - The anonymous identity pool
//! - Store traits implemented by the persistence layer
//! - Invite issuance and redemption services
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::InviteError;
