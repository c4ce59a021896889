//! In-memory group repository

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::group::{Group, GroupId, GroupRepository, UserGroupSummary};
use crate::domain::membership::{Membership, MembershipStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryGroupRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryGroupRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn get(&self, id: GroupId) -> Result<Option<Group>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.groups.get(&id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        creator_id: UserId,
    ) -> Result<(Group, Membership), DomainError> {
        let mut tables = self.db.write().await;

        if !tables.users.contains_key(&creator_id) {
            return Err(DomainError::not_found(format!(
                "user ({}) is not found",
                creator_id
            )));
        }

        let group = Group {
            id: tables.next_group_id(),
            name: name.to_string(),
            creator_id,
            balance: Decimal::ZERO,
        };
        let membership = Membership::new(
            tables.next_membership_id(),
            creator_id,
            group.id,
            MembershipStatus::Creator,
        );

        tables.groups.insert(group.id, group.clone());
        tables.memberships.insert(membership.id, membership.clone());

        Ok((group, membership))
    }

    async fn delete(&self, id: GroupId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;
        Ok(tables.delete_group(id))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<UserGroupSummary>, DomainError> {
        let tables = self.db.read().await;

        let mut summaries: Vec<UserGroupSummary> = tables
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter(|m| status.is_none_or(|s| m.status == s))
            .filter_map(|m| {
                let group = tables.groups.get(&m.group_id)?;
                let size = tables
                    .memberships
                    .values()
                    .filter(|other| other.group_id == group.id && other.is_active())
                    .count();

                Some(UserGroupSummary {
                    group_id: group.id,
                    name: group.name.clone(),
                    size: size as i64,
                    status: m.status,
                    creator_id: group.creator_id,
                    creator: tables.username(group.creator_id),
                    balance: group.balance,
                })
            })
            .collect();

        summaries.sort_by_key(|s| s.group_id);
        Ok(summaries)
    }
}
