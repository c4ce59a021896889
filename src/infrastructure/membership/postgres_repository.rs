//! PostgreSQL membership repository implementation

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::group::GroupId;
use crate::domain::membership::{
    JoinOutcome, Member, Membership, MembershipId, MembershipRepository, MembershipStatus,
    StatusChange,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_sqlx_error;

use super::repository::stale_change;

#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, group_id, status
            FROM users_groups
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get membership", e))?;

        row.as_ref().map(row_to_membership).transpose()
    }

    async fn request_join(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<JoinOutcome, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO users_groups (user_id, group_id, status)
            VALUES ($1, $2, 'pending')
            ON CONFLICT (user_id, group_id) DO NOTHING
            RETURNING id, user_id, group_id, status
            "#,
        )
        .bind(user_id.value())
        .bind(group_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to request membership", e))?;

        if let Some(row) = inserted {
            return Ok(JoinOutcome::Requested(row_to_membership(&row)?));
        }

        let existing = self.find(group_id, user_id).await?.ok_or_else(|| {
            DomainError::storage(format!(
                "membership of user {} in group {} vanished after a conflicting insert",
                user_id, group_id
            ))
        })?;

        Ok(JoinOutcome::AlreadyMember(existing))
    }

    async fn update_status(&self, change: &StatusChange) -> Result<Membership, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE users_groups AS target SET status = $2
            WHERE target.id = $1
              AND target.status = $3
              AND EXISTS (
                  SELECT 1 FROM users_groups actor
                  WHERE actor.id = $4 AND actor.status = $5
                  FOR SHARE
              )
            RETURNING target.id, target.user_id, target.group_id, target.status
            "#,
        )
        .bind(change.target.id.value())
        .bind(change.status.as_str())
        .bind(change.target.status.as_str())
        .bind(change.actor.id.value())
        .bind(change.actor.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update membership status", e))?;

        match row {
            Some(row) => row_to_membership(&row),
            None => Err(stale_change()),
        }
    }

    async fn list_members(
        &self,
        group_id: GroupId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Member>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT ug.id, ug.user_id, u.username, ug.status
            FROM users_groups ug
            JOIN users u ON u.id = ug.user_id
            WHERE ug.group_id = $1 AND ($2::TEXT IS NULL OR ug.status = $2)
            ORDER BY ug.id
            "#,
        )
        .bind(group_id.value())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list members", e))?;

        rows.iter()
            .map(|row| {
                Ok(Member {
                    membership_id: MembershipId::new(row.get("id")),
                    user_id: UserId::new(row.get("user_id")),
                    username: row.get("username"),
                    status: parse_status(row.get("status"))?,
                })
            })
            .collect()
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<MembershipStatus, DomainError> {
    MembershipStatus::from_str(raw)
        .map_err(|e| DomainError::storage(format!("Invalid status in database: {}", e)))
}

fn row_to_membership(row: &sqlx::postgres::PgRow) -> Result<Membership, DomainError> {
    Ok(Membership::new(
        MembershipId::new(row.get("id")),
        UserId::new(row.get("user_id")),
        GroupId::new(row.get("group_id")),
        parse_status(row.get("status"))?,
    ))
}
