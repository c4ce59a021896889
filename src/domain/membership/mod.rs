//! Membership domain
//!
//! Memberships tie a user to a group with a status. Status changes go
//! through [`authorize_transition`].

mod entity;
mod repository;
mod transition;

pub use entity::{
    JoinOutcome, Member, Membership, MembershipId, MembershipStatus, StatusChange, UnknownStatus,
};
pub use repository::MembershipRepository;
pub use transition::{authorize_transition, TransitionError};
