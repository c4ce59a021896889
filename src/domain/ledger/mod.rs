//! Ledger domain
//!
//! Operations are append-only. Every recorded operation moves the group
//! balance by its signed amount in the same store transaction, so the stored
//! balance always equals the sum of the ledger.

mod entity;
mod repository;
mod validation;

pub use entity::{
    Amount, BalanceReport, NewOperation, Operation, OperationId, OperationKind, OperationRecord,
    RecordedOperation,
};
pub use repository::LedgerRepository;
#[cfg(test)]
pub use repository::MockLedgerRepository;
pub use validation::{validate_operation_text, LedgerValidationError};
