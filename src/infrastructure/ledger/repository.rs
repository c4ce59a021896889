//! In-memory ledger repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::group::GroupId;
use crate::domain::ledger::{
    BalanceReport, LedgerRepository, NewOperation, OperationRecord, RecordedOperation,
};
use crate::domain::storage::Page;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables};

#[derive(Debug, Clone)]
pub struct InMemoryLedgerRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryLedgerRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

fn report(tables: &Tables, group_id: GroupId) -> Option<BalanceReport> {
    tables.groups.get(&group_id).map(|group| BalanceReport {
        group_id,
        stored: group.balance,
        computed: tables.ledger_sum(group_id),
    })
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn record(&self, operation: NewOperation) -> Result<RecordedOperation, DomainError> {
        let mut tables = self.db.write().await;

        let current = tables
            .groups
            .get(&operation.group_id)
            .map(|group| group.balance)
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "group with id={} is not found",
                    operation.group_id
                ))
            })?;

        if !tables
            .membership(operation.group_id, operation.user_id)
            .is_some_and(|m| m.is_active())
        {
            return Err(DomainError::unauthorized(format!(
                "user ({}) is not an active member of the group ({})",
                tables.username(operation.user_id),
                operation.group_id
            )));
        }

        let balance = operation
            .apply_to(current)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let id = tables.next_operation_id();
        let operation = operation.into_operation(id);

        if let Some(group) = tables.groups.get_mut(&operation.group_id) {
            group.balance = balance;
        }

        tables.operations.insert(id, operation.clone());

        Ok(RecordedOperation { operation, balance })
    }

    async fn list(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<Vec<OperationRecord>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .operations
            .values()
            .filter(|op| op.group_id == group_id)
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|op| OperationRecord {
                id: op.id,
                username: tables.username(op.user_id),
                kind: op.kind,
                amount: op.amount,
                name: op.name.clone(),
                description: op.description.clone(),
                created_at: op.created_at,
            })
            .collect())
    }

    async fn balance_report(
        &self,
        group_id: GroupId,
    ) -> Result<Option<BalanceReport>, DomainError> {
        let tables = self.db.read().await;
        Ok(report(&tables, group_id))
    }

    async fn audit_balances(&self) -> Result<Vec<BalanceReport>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .groups
            .keys()
            .filter_map(|id| report(&tables, *id))
            .collect())
    }
}
