//! Shared utilities and common types for the Gossip backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Invite token codec (Crockford base32 display codes)
//! - Collision-checked random token generation
//! - Password hashing with Argon2id
//! - Username and password validation
//! - Session secret hashing

pub mod codec;
pub mod crypto;
pub mod password;
pub mod token;
pub mod validation;
