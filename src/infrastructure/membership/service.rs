//! Membership service: join requests and status changes

use std::sync::Arc;

use tracing::info;

use crate::domain::group::{GroupId, GroupRepository};
use crate::domain::membership::{
    authorize_transition, JoinOutcome, Membership, MembershipRepository, MembershipStatus,
    StatusChange,
};
use crate::domain::user::{UserRef, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::access::{require_group, require_membership, require_user};

pub struct MembershipService {
    memberships: Arc<dyn MembershipRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl MembershipService {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            memberships,
            groups,
            users,
        }
    }

    /// Ask to join a group. Repeated requests leave the existing membership
    /// untouched.
    pub async fn request_join(
        &self,
        group_id: GroupId,
        user: &UserRef,
    ) -> Result<JoinOutcome, DomainError> {
        let group = require_group(self.groups.as_ref(), group_id).await?;
        let user = require_user(self.users.as_ref(), user).await?;

        let outcome = self.memberships.request_join(group.id, user.id()).await?;

        if let JoinOutcome::Requested(membership) = &outcome {
            info!(
                group_id = %group.id,
                user_id = %user.id(),
                membership_id = %membership.id,
                "Join requested"
            );
        }

        Ok(outcome)
    }

    /// Change the status of `target` on behalf of `requester`
    pub async fn set_status(
        &self,
        group_id: GroupId,
        requester: &UserRef,
        target: &UserRef,
        status: MembershipStatus,
    ) -> Result<Membership, DomainError> {
        let group = require_group(self.groups.as_ref(), group_id).await?;

        let requester = require_user(self.users.as_ref(), requester).await?;
        let actor = require_membership(self.memberships.as_ref(), &group, &requester).await?;

        let target = require_user(self.users.as_ref(), target).await?;
        let current = require_membership(self.memberships.as_ref(), &group, &target).await?;

        authorize_transition(actor.status, current.status, status)
            .map_err(|e| DomainError::forbidden(e.to_string()))?;

        let from = current.status;
        let updated = self
            .memberships
            .update_status(&StatusChange {
                actor,
                target: current,
                status,
            })
            .await?;

        info!(
            group_id = %group.id,
            requester_id = %requester.id(),
            target_id = %target.id(),
            from = %from,
            to = %updated.status,
            "Membership status changed"
        );

        Ok(updated)
    }
}
