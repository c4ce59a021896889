//! Membership entity and status types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::group::GroupId;
use crate::domain::user::UserId;

/// Store-assigned membership identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i64);

impl MembershipId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a user within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Founded the group; assigned once, never changes
    Creator,
    /// Manages pending and regular members
    Admin,
    /// Regular member
    User,
    /// Asked to join, waiting for approval
    Pending,
    /// Removed from the group by an admin
    Blocked,
}

impl MembershipStatus {
    pub const ALL: [MembershipStatus; 5] = [
        Self::Creator,
        Self::Admin,
        Self::User,
        Self::Pending,
        Self::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Admin => "admin",
            Self::User => "user",
            Self::Pending => "pending",
            Self::Blocked => "blocked",
        }
    }

    /// Active members may record operations and post to the chat
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Creator | Self::Admin | Self::User)
    }

    /// Check if this status can change other members' statuses at all
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Creator | Self::Admin)
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status '{0}' is not found")]
pub struct UnknownStatus(pub String);

impl FromStr for MembershipStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A user's membership in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub group_id: GroupId,
    pub status: MembershipStatus,
}

impl Membership {
    pub fn new(
        id: MembershipId,
        user_id: UserId,
        group_id: GroupId,
        status: MembershipStatus,
    ) -> Self {
        Self {
            id,
            user_id,
            group_id,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// A status change authorized against the memberships as they were read.
///
/// Stores apply it only while both memberships still hold those statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub actor: Membership,
    pub target: Membership,
    pub status: MembershipStatus,
}

/// A member row of a group roster, with the username resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub membership_id: MembershipId,
    pub user_id: UserId,
    pub username: String,
    pub status: MembershipStatus,
}

/// Result of a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new pending membership was created
    Requested(Membership),
    /// The user already had a membership; it is left untouched
    AlreadyMember(Membership),
}

impl JoinOutcome {
    pub fn membership(&self) -> &Membership {
        match self {
            Self::Requested(m) | Self::AlreadyMember(m) => m,
        }
    }
}
