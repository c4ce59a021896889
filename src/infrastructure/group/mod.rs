//! Group infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresGroupRepository;
pub use repository::InMemoryGroupRepository;
pub use service::GroupService;
