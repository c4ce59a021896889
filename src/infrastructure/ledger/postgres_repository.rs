//! PostgreSQL ledger repository implementation
//!
//! Recording an operation locks the group row and the author's membership,
//! inserts the operation and moves the balance inside one transaction.
//! Dropping the transaction on an error path rolls everything back.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::domain::group::GroupId;
use crate::domain::ledger::{
    BalanceReport, LedgerRepository, NewOperation, OperationId, OperationKind, OperationRecord,
    RecordedOperation,
};
use crate::domain::storage::Page;
use crate::domain::DomainError;
use crate::infrastructure::membership::parse_status;
use crate::infrastructure::storage::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BALANCE_REPORT_SELECT: &str = r#"
    SELECT g.id,
           g.balance AS stored,
           COALESCE((SELECT SUM(CASE WHEN o.kind = 'income' THEN o.amount ELSE -o.amount END)
                       FROM operations o
                      WHERE o.group_id = g.id), 0) AS computed
    FROM groups g
"#;

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    async fn record(&self, operation: NewOperation) -> Result<RecordedOperation, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to start transaction", e))?;

        let current: Option<Decimal> =
            sqlx::query_scalar("SELECT balance FROM groups WHERE id = $1 FOR UPDATE")
                .bind(operation.group_id.value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to lock group", e))?;

        let Some(current) = current else {
            return Err(DomainError::not_found(format!(
                "group with id={} is not found",
                operation.group_id
            )));
        };

        let status: Option<String> = sqlx::query_scalar(
            "SELECT status FROM users_groups WHERE group_id = $1 AND user_id = $2 FOR SHARE",
        )
        .bind(operation.group_id.value())
        .bind(operation.user_id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to lock membership", e))?;

        let active = match status {
            Some(status) => parse_status(&status)?.is_active(),
            None => false,
        };

        if !active {
            return Err(DomainError::unauthorized(format!(
                "user ({}) is not an active member of the group ({})",
                operation.user_id, operation.group_id
            )));
        }

        let balance = operation
            .apply_to(current)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO operations (user_id, group_id, kind, amount, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(operation.user_id.value())
        .bind(operation.group_id.value())
        .bind(operation.kind.as_str())
        .bind(operation.amount.value())
        .bind(&operation.name)
        .bind(&operation.description)
        .bind(operation.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert operation", e))?;

        let operation = operation.into_operation(OperationId::new(id));

        sqlx::query("UPDATE groups SET balance = $2 WHERE id = $1")
            .bind(operation.group_id.value())
            .bind(balance)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to update group balance", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit operation", e))?;

        Ok(RecordedOperation { operation, balance })
    }

    async fn list(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<Vec<OperationRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, u.username, o.kind, o.amount, o.name, o.description, o.created_at
            FROM operations o
            JOIN users u ON u.id = o.user_id
            WHERE o.group_id = $1
            ORDER BY o.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(group_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list operations", e))?;

        rows.iter()
            .map(|row| {
                let kind: &str = row.get("kind");
                let created_at: DateTime<Utc> = row.get("created_at");

                Ok(OperationRecord {
                    id: OperationId::new(row.get("id")),
                    username: row.get("username"),
                    kind: OperationKind::from_str(kind).map_err(|e| {
                        DomainError::storage(format!("Invalid operation kind in database: {}", e))
                    })?,
                    amount: row.get("amount"),
                    name: row.get("name"),
                    description: row.get("description"),
                    created_at,
                })
            })
            .collect()
    }

    async fn balance_report(
        &self,
        group_id: GroupId,
    ) -> Result<Option<BalanceReport>, DomainError> {
        let sql = format!("{} WHERE g.id = $1", BALANCE_REPORT_SELECT);

        let row = sqlx::query(&sql)
            .bind(group_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to compute balance", e))?;

        Ok(row.as_ref().map(row_to_report))
    }

    async fn audit_balances(&self) -> Result<Vec<BalanceReport>, DomainError> {
        let sql = format!("{} ORDER BY g.id", BALANCE_REPORT_SELECT);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to audit balances", e))?;

        Ok(rows.iter().map(row_to_report).collect())
    }
}

fn row_to_report(row: &sqlx::postgres::PgRow) -> BalanceReport {
    BalanceReport {
        group_id: GroupId::new(row.get("id")),
        stored: row.get("stored"),
        computed: row.get("computed"),
    }
}
