//! PostgreSQL chat repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::chat::{ChatMessage, Message, MessageId, MessageRepository, NewMessage};
use crate::domain::group::GroupId;
use crate::domain::storage::Page;
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_sqlx_error;

#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn append(&self, message: NewMessage) -> Result<Message, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO messages (membership_id, text, sent_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(message.membership_id.value())
        .bind(&message.text)
        .bind(message.sent_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to post message", e))?;

        Ok(message.into_message(MessageId::new(id)))
    }

    async fn list(&self, group_id: GroupId, page: Page) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, ug.user_id, u.username, m.text, m.sent_at
            FROM messages m
            JOIN users_groups ug ON ug.id = m.membership_id
            JOIN users u ON u.id = ug.user_id
            WHERE ug.group_id = $1
            ORDER BY m.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(group_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list messages", e))?;

        Ok(rows
            .iter()
            .map(|row| {
                let sent_at: DateTime<Utc> = row.get("sent_at");

                ChatMessage {
                    id: MessageId::new(row.get("id")),
                    user_id: UserId::new(row.get("user_id")),
                    username: row.get("username"),
                    text: row.get("text"),
                    sent_at,
                }
            })
            .collect())
    }
}
