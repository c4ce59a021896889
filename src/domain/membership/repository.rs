//! Membership repository trait

use async_trait::async_trait;

use super::entity::{JoinOutcome, Member, Membership, MembershipStatus, StatusChange};
use crate::domain::group::GroupId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for user-in-group memberships
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find the membership of a user in a group
    async fn find(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError>;

    /// Create a pending membership unless one already exists for the pair
    async fn request_join(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<JoinOutcome, DomainError>;

    /// Apply a status change. Fails with `Forbidden` when the actor or the
    /// target no longer holds the status the change was authorized against.
    async fn update_status(&self, change: &StatusChange) -> Result<Membership, DomainError>;

    /// List the members of a group ordered by membership id
    async fn list_members(
        &self,
        group_id: GroupId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Member>, DomainError>;
}
