//! Group service: creation, views and deletion

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::group::{
    validate_group_name, Group, GroupId, GroupRepository, GroupView, UserGroupSummary,
};
use crate::domain::membership::{Membership, MembershipRepository, MembershipStatus};
use crate::domain::user::{UserRef, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::access::{require_group, require_user};

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            groups,
            memberships,
            users,
        }
    }

    /// Create a group and enroll `creator` as its creator
    pub async fn create_group(
        &self,
        name: &str,
        creator: &UserRef,
    ) -> Result<(Group, Membership), DomainError> {
        validate_group_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let creator = require_user(self.users.as_ref(), creator).await?;
        let (group, membership) = self.groups.create(name.trim(), creator.id()).await?;

        info!(
            group_id = %group.id,
            creator_id = %creator.id(),
            name = %group.name,
            "Created group"
        );

        Ok((group, membership))
    }

    /// Group header plus its roster, optionally filtered by status
    pub async fn get_group(
        &self,
        id: GroupId,
        status: Option<MembershipStatus>,
    ) -> Result<GroupView, DomainError> {
        let group = require_group(self.groups.as_ref(), id).await?;

        let creator = self
            .users
            .get(group.creator_id)
            .await?
            .map(|user| user.username().to_string())
            .unwrap_or_default();
        let members = self.memberships.list_members(group.id, status).await?;

        debug!(group_id = %group.id, members = members.len(), "Loaded group");

        Ok(GroupView {
            group,
            creator,
            members,
        })
    }

    /// Groups the user belongs to, filtered by the user's own status
    pub async fn list_user_groups(
        &self,
        user: &UserRef,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<UserGroupSummary>, DomainError> {
        let user = require_user(self.users.as_ref(), user).await?;
        let groups = self.groups.list_for_user(user.id(), status).await?;

        debug!(user_id = %user.id(), count = groups.len(), "Listed user groups");
        Ok(groups)
    }

    /// Delete a group; only its creator may do so
    pub async fn delete_group(&self, id: GroupId, requester: &UserRef) -> Result<(), DomainError> {
        let group = require_group(self.groups.as_ref(), id).await?;
        let requester = require_user(self.users.as_ref(), requester).await?;

        if requester.id() != group.creator_id {
            return Err(DomainError::forbidden(
                "only the creator of the group can delete it",
            ));
        }

        if !self.groups.delete(group.id).await? {
            return Err(DomainError::not_found(format!(
                "group with id={} is not found",
                group.id
            )));
        }

        info!(group_id = %group.id, requester_id = %requester.id(), "Deleted group");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;
    use crate::infrastructure::membership::MembershipService;
    use crate::infrastructure::storage::Repositories;
    use rust_decimal::Decimal;

    async fn setup() -> (Repositories, GroupService) {
        let repos = Repositories::in_memory();
        for name in ["alice", "bob"] {
            repos.users.create(NewUser::new(name, "hash")).await.unwrap();
        }

        let service = GroupService::new(
            repos.groups.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
        );
        (repos, service)
    }

    #[tokio::test]
    async fn test_create_group_enrolls_creator() {
        let (_repos, service) = setup().await;

        let (group, membership) = service
            .create_group("Trip", &UserRef::name("alice"))
            .await
            .unwrap();

        assert_eq!(group.name, "Trip");
        assert_eq!(group.balance, Decimal::ZERO);
        assert_eq!(membership.status, MembershipStatus::Creator);
        assert_eq!(membership.group_id, group.id);

        let view = service.get_group(group.id, None).await.unwrap();
        assert_eq!(view.creator, "alice");
        assert_eq!(view.members.len(), 1);
        assert_eq!(view.members[0].status, MembershipStatus::Creator);
    }

    #[tokio::test]
    async fn test_create_group_validation() {
        let (_repos, service) = setup().await;

        let empty = service.create_group("  ", &UserRef::name("alice")).await;
        assert!(matches!(empty, Err(DomainError::Validation { .. })));

        let unknown = service.create_group("Trip", &UserRef::name("zed")).await;
        assert!(matches!(unknown, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_missing_group() {
        let (_repos, service) = setup().await;

        let result = service.get_group(GroupId::new(5), None).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_user_groups_with_status_filter() {
        let (repos, service) = setup().await;
        let memberships = MembershipService::new(
            repos.memberships.clone(),
            repos.groups.clone(),
            repos.users.clone(),
        );

        let (trip, _) = service
            .create_group("Trip", &UserRef::name("alice"))
            .await
            .unwrap();
        let (flat, _) = service
            .create_group("Flat", &UserRef::name("bob"))
            .await
            .unwrap();
        memberships
            .request_join(flat.id, &UserRef::name("alice"))
            .await
            .unwrap();

        let all = service
            .list_user_groups(&UserRef::name("alice"), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].group_id, trip.id);
        assert_eq!(all[0].status, MembershipStatus::Creator);
        assert_eq!(all[1].status, MembershipStatus::Pending);
        assert_eq!(all[1].creator, "bob");
        assert_eq!(all[1].size, 1);

        let pending = service
            .list_user_groups(&UserRef::id(1), Some(MembershipStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].group_id, flat.id);
    }

    #[tokio::test]
    async fn test_only_creator_deletes() {
        let (repos, service) = setup().await;
        let (group, _) = service
            .create_group("Trip", &UserRef::name("alice"))
            .await
            .unwrap();

        let denied = service.delete_group(group.id, &UserRef::name("bob")).await;
        assert!(matches!(denied, Err(DomainError::Forbidden { .. })));

        service
            .delete_group(group.id, &UserRef::name("alice"))
            .await
            .unwrap();
        assert!(repos.groups.get(group.id).await.unwrap().is_none());
        assert!(repos
            .memberships
            .list_members(group.id, None)
            .await
            .unwrap()
            .is_empty());

        let again = service.delete_group(group.id, &UserRef::name("alice")).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }
}
