//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod account;
pub mod invite_code;
pub mod session;

pub use account::{AccountEntity, AccountRoleDb};
pub use invite_code::InviteCodeEntity;
pub use session::SessionEntity;
