//! Ledger entities: operations, amounts and balance reports

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::LedgerValidationError;
use crate::domain::group::GroupId;
use crate::domain::user::UserId;

/// Store-assigned operation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(i64);

impl OperationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Income,
    Spending,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Spending => "spending",
        }
    }

    /// Balance delta of this kind of operation for a given amount
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Spending => -amount,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = LedgerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "spending" => Ok(Self::Spending),
            other => Err(LedgerValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// A strictly positive decimal amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerValidationError> {
        if value <= Decimal::ZERO {
            return Err(LedgerValidationError::NonPositiveAmount(value.to_string()));
        }

        Ok(Self(value.normalize()))
    }

    /// Parse client input such as `"12.50"`, `"40"` or `"1e3"`
    pub fn parse(raw: &str) -> Result<Self, LedgerValidationError> {
        let trimmed = raw.trim();

        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| LedgerValidationError::NotANumber(raw.to_string()))?;

        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// An operation that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub kind: OperationKind,
    pub amount: Amount,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewOperation {
    /// Balance after this operation, or an error when it leaves the
    /// representable range
    pub fn apply_to(&self, balance: Decimal) -> Result<Decimal, LedgerValidationError> {
        balance
            .checked_add(self.kind.signed(self.amount.value()))
            .ok_or(LedgerValidationError::BalanceOverflow)
    }

    /// Attach the store-assigned identifier
    pub fn into_operation(self, id: OperationId) -> Operation {
        Operation {
            id,
            group_id: self.group_id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount.value(),
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

/// An immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub id: OperationId,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Operation {
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Result of a committed ledger write
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOperation {
    pub operation: Operation,
    /// Group balance right after this operation was applied
    pub balance: Decimal,
}

/// An operation as listed to group members, with the author resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub id: OperationId,
    pub username: String,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Stored balance compared with the balance recomputed from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub group_id: GroupId,
    pub stored: Decimal,
    pub computed: Decimal,
}

impl BalanceReport {
    pub fn is_consistent(&self) -> bool {
        self.stored == self.computed
    }
}
