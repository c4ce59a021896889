//! Group lifecycle and membership endpoints

use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::parse_status_filter;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::group::{GroupId, GroupView, UserGroupSummary};
use crate::domain::membership::{Membership, MembershipStatus};
use crate::domain::user::UserRef;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserParam {
    pub user: UserRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub user: UserRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusParams {
    pub user: UserRef,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub username: String,
    pub status: MembershipStatus,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub creator_id: i64,
    pub creator: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub users: Vec<MemberResponse>,
}

impl From<GroupView> for GroupResponse {
    fn from(view: GroupView) -> Self {
        Self {
            id: view.group.id.value(),
            name: view.group.name,
            creator_id: view.group.creator_id.value(),
            creator: view.creator,
            balance: view.group.balance,
            users: view
                .members
                .into_iter()
                .map(|m| MemberResponse {
                    id: m.user_id.value(),
                    username: m.username,
                    status: m.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetGroupResponse {
    pub group: GroupResponse,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupResponse {
    pub group_id: i64,
    pub user_group_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteGroupResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct UserGroupResponse {
    pub id: i64,
    pub name: String,
    pub size: i64,
    pub status: MembershipStatus,
    pub creator_id: i64,
    pub creator: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<UserGroupSummary> for UserGroupResponse {
    fn from(summary: UserGroupSummary) -> Self {
        Self {
            id: summary.group_id.value(),
            name: summary.name,
            size: summary.size,
            status: summary.status,
            creator_id: summary.creator_id.value(),
            creator: summary.creator,
            balance: summary.balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserGroupsResponse {
    pub groups: Vec<UserGroupResponse>,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub result: &'static str,
    pub status: MembershipStatus,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub status: MembershipStatus,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            id: membership.id.value(),
            user_id: membership.user_id.value(),
            group_id: membership.group_id.value(),
            status: membership.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub result: &'static str,
    pub membership: MembershipResponse,
}

/// GET /group/{id}/
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<GetGroupResponse>, ApiError> {
    let status = parse_status_filter(filter.status.as_deref())?;
    let view = state.group_service.get_group(GroupId::new(id), status).await?;

    Ok(Json(GetGroupResponse {
        group: view.into(),
    }))
}

/// POST /group/
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<Json<CreateGroupResponse>, ApiError> {
    let (group, membership) = state
        .group_service
        .create_group(&request.name, &request.user)
        .await?;

    Ok(Json(CreateGroupResponse {
        group_id: group.id.value(),
        user_group_id: membership.id.value(),
    }))
}

/// DELETE /group/{id}/
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<DeleteGroupResponse>, ApiError> {
    state
        .group_service
        .delete_group(GroupId::new(id), &params.user)
        .await?;

    Ok(Json(DeleteGroupResponse {
        result: format!("deleted group with id={}", id),
    }))
}

/// GET /user/{user}/groups/
pub async fn list_user_groups(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<UserGroupsResponse>, ApiError> {
    let status = parse_status_filter(filter.status.as_deref())?;
    let groups = state
        .group_service
        .list_user_groups(&UserRef::parse(&user), status)
        .await?;

    Ok(Json(UserGroupsResponse {
        groups: groups.into_iter().map(Into::into).collect(),
    }))
}

/// POST /group/{id}/join/
pub async fn join_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserParam>,
) -> Result<Json<JoinResponse>, ApiError> {
    let outcome = state
        .membership_service
        .request_join(GroupId::new(id), &params.user)
        .await?;

    Ok(Json(JoinResponse {
        result: "ok",
        status: outcome.membership().status,
    }))
}

/// PUT /group/{id}/status/{user}/
///
/// `user` in the query is the member making the change; the path names the
/// member whose status changes.
pub async fn set_status(
    State(state): State<AppState>,
    Path((id, target)): Path<(i64, String)>,
    Query(params): Query<SetStatusParams>,
) -> Result<Json<SetStatusResponse>, ApiError> {
    let status = params
        .status
        .parse::<MembershipStatus>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let membership = state
        .membership_service
        .set_status(
            GroupId::new(id),
            &params.user,
            &UserRef::parse(&target),
            status,
        )
        .await?;

    Ok(Json(SetStatusResponse {
        result: "ok",
        membership: membership.into(),
    }))
}
