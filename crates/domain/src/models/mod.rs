//! Domain models for Gossip.

pub mod account;
pub mod invite;

pub use account::{Account, AccountRole, NewAccount, Requester};
pub use invite::{
    InviteCode, InviteInspection, InviteRole, Invitee, IssuedInvite, IssueInvitesRequest,
    IssueInvitesResponse, NewInviteCode, SignupRequest,
};
