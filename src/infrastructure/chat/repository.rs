//! In-memory chat repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, Message, MessageRepository, NewMessage};
use crate::domain::group::GroupId;
use crate::domain::storage::Page;
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryMessageRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryMessageRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: NewMessage) -> Result<Message, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.memberships.contains_key(&message.membership_id) {
            return Err(DomainError::not_found(format!(
                "membership {} is not found",
                message.membership_id
            )));
        }

        let id = tables.next_message_id();
        let message = message.into_message(id);
        tables.messages.insert(id, message.clone());

        Ok(message)
    }

    async fn list(&self, group_id: GroupId, page: Page) -> Result<Vec<ChatMessage>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .messages
            .values()
            .rev()
            .filter_map(|message| {
                let membership = tables.memberships.get(&message.membership_id)?;
                (membership.group_id == group_id).then(|| ChatMessage {
                    id: message.id,
                    user_id: membership.user_id,
                    username: tables.username(membership.user_id),
                    text: message.text.clone(),
                    sent_at: message.sent_at,
                })
            })
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}
