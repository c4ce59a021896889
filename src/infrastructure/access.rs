//! Lookups shared by the services: resolve users and groups, and check that
//! a user belongs to a group.

use crate::domain::group::{Group, GroupId, GroupRepository};
use crate::domain::membership::{Membership, MembershipRepository};
use crate::domain::user::{User, UserRef, UserRepository};
use crate::domain::DomainError;

pub(crate) async fn require_user(
    users: &dyn UserRepository,
    user: &UserRef,
) -> Result<User, DomainError> {
    users
        .resolve(user)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("user ({}) is not found", user)))
}

pub(crate) async fn require_group(
    groups: &dyn GroupRepository,
    id: GroupId,
) -> Result<Group, DomainError> {
    groups
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("group with id={} is not found", id)))
}

/// Membership of `user` in `group`, in any status
pub(crate) async fn require_membership(
    memberships: &dyn MembershipRepository,
    group: &Group,
    user: &User,
) -> Result<Membership, DomainError> {
    memberships
        .find(group.id, user.id())
        .await?
        .ok_or_else(|| {
            DomainError::not_found(format!(
                "user ({}) is not found in the group ({})",
                user.username(),
                group.id
            ))
        })
}

/// Membership of `user` in `group` that allows recording and posting
pub(crate) async fn require_active_membership(
    memberships: &dyn MembershipRepository,
    group: &Group,
    user: &User,
) -> Result<Membership, DomainError> {
    let membership = memberships
        .find(group.id, user.id())
        .await?
        .filter(Membership::is_active);

    membership.ok_or_else(|| {
        DomainError::unauthorized(format!(
            "user ({}) is not an active member of the group ({})",
            user.username(),
            group.id
        ))
    })
}
