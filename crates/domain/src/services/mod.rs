//! Domain services for Gossip.
//!
//! Services contain business logic that operates on domain models. Store
//! collaborators are injected through the traits in [`store`].

pub mod anonymous_pool;
pub mod issuance;
pub mod memory;
pub mod redemption;
pub mod store;

pub use anonymous_pool::{available_names, is_reserved_name, ANONYMOUS_USERNAMES};
pub use issuance::InviteIssuanceService;
pub use memory::InMemoryStore;
pub use redemption::InviteRedemptionService;
pub use store::{AccountStore, InviteCodeStore, RegistrationStore, StoreError};
