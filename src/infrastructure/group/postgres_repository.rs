//! PostgreSQL group repository implementation

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::domain::group::{Group, GroupId, GroupRepository, UserGroupSummary};
use crate::domain::membership::{Membership, MembershipId, MembershipStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::membership::parse_status;
use crate::infrastructure::storage::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn get(&self, id: GroupId) -> Result<Option<Group>, DomainError> {
        let row = sqlx::query("SELECT id, name, creator_id, balance FROM groups WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get group", e))?;

        Ok(row.map(|row| Group {
            id: GroupId::new(row.get("id")),
            name: row.get("name"),
            creator_id: UserId::new(row.get("creator_id")),
            balance: row.get("balance"),
        }))
    }

    async fn create(
        &self,
        name: &str,
        creator_id: UserId,
    ) -> Result<(Group, Membership), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to start transaction", e))?;

        let group_id: i64 = sqlx::query_scalar(
            "INSERT INTO groups (name, creator_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(creator_id.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to create group", e))?;

        let membership_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users_groups (user_id, group_id, status)
            VALUES ($1, $2, 'creator')
            RETURNING id
            "#,
        )
        .bind(creator_id.value())
        .bind(group_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to enroll group creator", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit group creation", e))?;

        let group = Group {
            id: GroupId::new(group_id),
            name: name.to_string(),
            creator_id,
            balance: Decimal::ZERO,
        };
        let membership = Membership::new(
            MembershipId::new(membership_id),
            creator_id,
            group.id,
            MembershipStatus::Creator,
        );

        Ok((group, membership))
    }

    async fn delete(&self, id: GroupId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete group", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<UserGroupSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name, g.creator_id, c.username AS creator, g.balance, ug.status,
                   (SELECT COUNT(*) FROM users_groups a
                     WHERE a.group_id = g.id
                       AND a.status IN ('creator', 'admin', 'user')) AS size
            FROM users_groups ug
            JOIN groups g ON g.id = ug.group_id
            JOIN users c ON c.id = g.creator_id
            WHERE ug.user_id = $1 AND ($2::TEXT IS NULL OR ug.status = $2)
            ORDER BY g.id
            "#,
        )
        .bind(user_id.value())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list user groups", e))?;

        rows.iter()
            .map(|row| {
                Ok(UserGroupSummary {
                    group_id: GroupId::new(row.get("id")),
                    name: row.get("name"),
                    size: row.get("size"),
                    status: parse_status(row.get("status"))?,
                    creator_id: UserId::new(row.get("creator_id")),
                    creator: row.get("creator"),
                    balance: row.get("balance"),
                })
            })
            .collect()
    }
}
