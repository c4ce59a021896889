//! Ledger infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresLedgerRepository;
pub use repository::InMemoryLedgerRepository;
pub use service::{LedgerService, RecordOperationRequest};
