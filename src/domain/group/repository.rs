//! Group repository trait

use async_trait::async_trait;

use super::entity::{Group, GroupId, UserGroupSummary};
use crate::domain::membership::{Membership, MembershipStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for groups
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Get a group by id
    async fn get(&self, id: GroupId) -> Result<Option<Group>, DomainError>;

    /// Insert a group with zero balance and enroll its creator, atomically
    async fn create(
        &self,
        name: &str,
        creator_id: UserId,
    ) -> Result<(Group, Membership), DomainError>;

    /// Delete a group together with its memberships, operations and messages
    async fn delete(&self, id: GroupId) -> Result<bool, DomainError>;

    /// Groups the user belongs to, ordered by group id, optionally filtered
    /// by the user's own status
    async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<UserGroupSummary>, DomainError>;
}
