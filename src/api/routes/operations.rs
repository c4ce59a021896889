//! Ledger endpoints

use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format_timestamp;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::group::GroupId;
use crate::domain::ledger::{BalanceReport, OperationKind, OperationRecord};
use crate::domain::storage::Page;
use crate::domain::user::UserRef;
use crate::infrastructure::ledger::RecordOperationRequest;

/// An amount as sent by clients, either `12.5` or `"12.5"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    fn into_raw(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordOperationBody {
    pub user: UserRef,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: AmountInput,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagedUserParams {
    pub user: UserRef,
    #[serde(default)]
    pub page: Page,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserParam {
    pub user: UserRef,
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub id: i64,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub name: String,
    pub description: String,
    pub date: String,
}

impl From<OperationRecord> for OperationResponse {
    fn from(record: OperationRecord) -> Self {
        Self {
            id: record.id.value(),
            user: record.username,
            kind: record.kind,
            amount: record.amount,
            name: record.name,
            description: record.description,
            date: format_timestamp(&record.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OperationsResponse {
    pub operations: Vec<OperationResponse>,
}

#[derive(Debug, Serialize)]
pub struct RecordOperationResponse {
    pub result: &'static str,
    pub operation_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub stored: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub computed: Decimal,
    pub consistent: bool,
}

impl From<BalanceReport> for BalanceResponse {
    fn from(report: BalanceReport) -> Self {
        Self {
            consistent: report.is_consistent(),
            stored: report.stored,
            computed: report.computed,
        }
    }
}

/// GET /group/{id}/operations/
pub async fn list_operations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PagedUserParams>,
) -> Result<Json<OperationsResponse>, ApiError> {
    let operations = state
        .ledger_service
        .list_operations(GroupId::new(id), &params.user, params.page)
        .await?;

    Ok(Json(OperationsResponse {
        operations: operations.into_iter().map(Into::into).collect(),
    }))
}

/// POST /group/{id}/operation/
pub async fn record_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RecordOperationBody>,
) -> Result<Json<RecordOperationResponse>, ApiError> {
    let recorded = state
        .ledger_service
        .record_operation(RecordOperationRequest {
            group_id: GroupId::new(id),
            user: body.user,
            kind: body.kind,
            amount: body.amount.into_raw(),
            name: body.name,
            description: body.description,
        })
        .await?;

    Ok(Json(RecordOperationResponse {
        result: "ok",
        operation_id: recorded.operation.id.value(),
        balance: recorded.balance,
    }))
}

/// GET /group/{id}/balance/
pub async fn verify_balance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let report = state
        .ledger_service
        .verify_balance(GroupId::new(id), &params.user)
        .await?;

    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_input_accepts_number_and_string() {
        let body: RecordOperationBody = serde_json::from_str(
            r#"{"user": 1, "type": "income", "amount": 12.5, "name": "Fuel"}"#,
        )
        .unwrap();
        assert_eq!(body.amount.into_raw(), "12.5");
        assert_eq!(body.user, UserRef::id(1));
        assert!(body.description.is_none());

        let body: RecordOperationBody = serde_json::from_str(
            r#"{"user": "alice", "type": "spending", "amount": "40", "name": "Food", "description": "lunch"}"#,
        )
        .unwrap();
        assert_eq!(body.amount.into_raw(), "40");
        assert_eq!(body.user, UserRef::name("alice"));
        assert_eq!(body.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_balance_response_is_numeric() {
        let response = BalanceResponse::from(BalanceReport {
            group_id: GroupId::new(1),
            stored: Decimal::new(605, 1),
            computed: Decimal::new(605, 1),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["stored"], serde_json::json!(60.5));
        assert_eq!(json["consistent"], serde_json::json!(true));
    }
}
