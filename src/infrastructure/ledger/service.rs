//! Ledger service: recording and listing operations, balance checks

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::group::{GroupId, GroupRepository};
use crate::domain::ledger::{
    validate_operation_text, Amount, BalanceReport, LedgerRepository, NewOperation,
    OperationKind, OperationRecord, RecordedOperation,
};
use crate::domain::membership::MembershipRepository;
use crate::domain::storage::Page;
use crate::domain::user::{UserRef, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::access::{require_active_membership, require_group, require_user};

/// Raw client input for a new operation
#[derive(Debug, Clone)]
pub struct RecordOperationRequest {
    pub group_id: GroupId,
    pub user: UserRef,
    pub kind: String,
    pub amount: String,
    pub name: String,
    pub description: Option<String>,
}

pub struct LedgerService {
    ledger: Arc<dyn LedgerRepository>,
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl LedgerService {
    pub fn new(
        ledger: Arc<dyn LedgerRepository>,
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            ledger,
            groups,
            memberships,
            users,
        }
    }

    /// Validate and record an operation, moving the group balance with it
    pub async fn record_operation(
        &self,
        request: RecordOperationRequest,
    ) -> Result<RecordedOperation, DomainError> {
        let kind = request
            .kind
            .parse::<OperationKind>()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let amount =
            Amount::parse(&request.amount).map_err(|e| DomainError::validation(e.to_string()))?;
        let description = request.description.unwrap_or_default();
        validate_operation_text(&request.name, &description)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let user = require_user(self.users.as_ref(), &request.user).await?;
        let group = require_group(self.groups.as_ref(), request.group_id).await?;
        require_active_membership(self.memberships.as_ref(), &group, &user).await?;

        let recorded = self
            .ledger
            .record(NewOperation {
                group_id: group.id,
                user_id: user.id(),
                kind,
                amount,
                name: request.name,
                description,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            group_id = %group.id,
            user_id = %user.id(),
            operation_id = %recorded.operation.id,
            kind = %kind,
            amount = %amount.value(),
            balance = %recorded.balance,
            "Recorded operation"
        );

        Ok(recorded)
    }

    /// One page of a group's operations, oldest first
    pub async fn list_operations(
        &self,
        group_id: GroupId,
        user: &UserRef,
        page: Page,
    ) -> Result<Vec<OperationRecord>, DomainError> {
        let user = require_user(self.users.as_ref(), user).await?;
        let group = require_group(self.groups.as_ref(), group_id).await?;
        require_active_membership(self.memberships.as_ref(), &group, &user).await?;

        let operations = self.ledger.list(group.id, page).await?;

        debug!(
            group_id = %group.id,
            page = page.index(),
            count = operations.len(),
            "Listed operations"
        );

        Ok(operations)
    }

    /// Compare the stored balance of a group with its recomputed ledger sum
    pub async fn verify_balance(
        &self,
        group_id: GroupId,
        user: &UserRef,
    ) -> Result<BalanceReport, DomainError> {
        let user = require_user(self.users.as_ref(), user).await?;
        let group = require_group(self.groups.as_ref(), group_id).await?;
        require_active_membership(self.memberships.as_ref(), &group, &user).await?;

        let report = self.ledger.balance_report(group.id).await?.ok_or_else(|| {
            DomainError::not_found(format!("group with id={} is not found", group.id))
        })?;

        if !report.is_consistent() {
            warn!(
                group_id = %group.id,
                stored = %report.stored,
                computed = %report.computed,
                "Group balance drifted from its ledger"
            );
        }

        Ok(report)
    }

    /// Balance reports for every group
    pub async fn audit(&self) -> Result<Vec<BalanceReport>, DomainError> {
        self.ledger.audit_balances().await
    }
}
