//! Group entity and views

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::membership::{Member, MembershipStatus};
use crate::domain::user::UserId;

/// Store-assigned group identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared financial pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub creator_id: UserId,
    /// Running sum of signed operation amounts
    pub balance: Decimal,
}

/// Group header together with its roster
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub group: Group,
    pub creator: String,
    pub members: Vec<Member>,
}

/// One row of a user's group list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGroupSummary {
    pub group_id: GroupId,
    pub name: String,
    /// Number of active members
    pub size: i64,
    /// The listing user's own status in the group
    pub status: MembershipStatus,
    pub creator_id: UserId,
    pub creator: String,
    pub balance: Decimal,
}
