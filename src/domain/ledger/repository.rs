//! Ledger repository trait

use async_trait::async_trait;

use super::entity::{BalanceReport, NewOperation, OperationRecord, RecordedOperation};
use crate::domain::group::GroupId;
use crate::domain::storage::Page;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for the append-only operation ledger
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Insert the operation and apply its signed amount to the group balance
    /// in one transaction. Returns `NotFound` when the group does not exist.
    async fn record(&self, operation: NewOperation) -> Result<RecordedOperation, DomainError>;

    /// Operations of a group in insertion order
    async fn list(&self, group_id: GroupId, page: Page)
        -> Result<Vec<OperationRecord>, DomainError>;

    /// Stored balance next to the sum of the group's signed amounts
    async fn balance_report(&self, group_id: GroupId)
        -> Result<Option<BalanceReport>, DomainError>;

    /// Balance reports for every group, ordered by group id
    async fn audit_balances(&self) -> Result<Vec<BalanceReport>, DomainError>;
}
