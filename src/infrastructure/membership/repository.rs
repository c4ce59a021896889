//! In-memory membership repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::group::GroupId;
use crate::domain::membership::{
    JoinOutcome, Member, Membership, MembershipId, MembershipRepository, MembershipStatus,
    StatusChange,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryMembershipRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryMembershipRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn find(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.membership(group_id, user_id).cloned())
    }

    async fn request_join(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<JoinOutcome, DomainError> {
        let mut tables = self.db.write().await;

        if let Some(existing) = tables.membership(group_id, user_id) {
            return Ok(JoinOutcome::AlreadyMember(existing.clone()));
        }

        if !tables.groups.contains_key(&group_id) {
            return Err(DomainError::not_found(format!(
                "group with id={} is not found",
                group_id
            )));
        }

        if !tables.users.contains_key(&user_id) {
            return Err(DomainError::not_found(format!("user ({}) is not found", user_id)));
        }

        let id = tables.next_membership_id();
        let membership = Membership::new(id, user_id, group_id, MembershipStatus::Pending);
        tables.memberships.insert(id, membership.clone());

        Ok(JoinOutcome::Requested(membership))
    }

    async fn update_status(&self, change: &StatusChange) -> Result<Membership, DomainError> {
        let mut tables = self.db.write().await;
        let target_id = change.target.id;

        let holds = |id: MembershipId, status: MembershipStatus| {
            tables.memberships.get(&id).is_some_and(|m| m.status == status)
        };

        if !tables.memberships.contains_key(&target_id) {
            return Err(DomainError::not_found(format!(
                "membership {} is not found",
                target_id
            )));
        }

        if !holds(change.actor.id, change.actor.status)
            || !holds(target_id, change.target.status)
        {
            return Err(stale_change());
        }

        let group_id = change.target.group_id;
        if change.status == MembershipStatus::Creator
            && tables.memberships.values().any(|m| {
                m.group_id == group_id && m.id != target_id && m.status == MembershipStatus::Creator
            })
        {
            return Err(DomainError::conflict(format!(
                "group ({}) already has a creator",
                group_id
            )));
        }

        let membership = tables.memberships.get_mut(&target_id).ok_or_else(|| {
            DomainError::not_found(format!("membership {} is not found", target_id))
        })?;
        membership.status = change.status;

        Ok(membership.clone())
    }

    async fn list_members(
        &self,
        group_id: GroupId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Member>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .memberships
            .values()
            .filter(|m| m.group_id == group_id)
            .filter(|m| status.is_none_or(|s| m.status == s))
            .map(|m| Member {
                membership_id: m.id,
                user_id: m.user_id,
                username: tables.username(m.user_id),
                status: m.status,
            })
            .collect())
    }
}

pub(crate) fn stale_change() -> DomainError {
    DomainError::forbidden("membership status changed while the request was processed")
}
