//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, registered_at FROM users WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, registered_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user by username", e))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash, registered_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.registered_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("Failed to create user", e) {
            DomainError::Conflict { .. } => DomainError::conflict(format!(
                "username '{}' is already taken",
                user.username
            )),
            other => other,
        })?;

        Ok(user.into_user(UserId::new(id)))
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    let registered_at: DateTime<Utc> = row.get("registered_at");

    User::new(
        UserId::new(row.get("id")),
        row.get::<String, _>("username"),
        row.get::<String, _>("password_hash"),
        registered_at,
    )
}
