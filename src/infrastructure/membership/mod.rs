//! Membership infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub(crate) use postgres_repository::parse_status;
pub use postgres_repository::PostgresMembershipRepository;
pub use repository::InMemoryMembershipRepository;
pub use service::MembershipService;
