//! Chat repository trait

use async_trait::async_trait;

use super::entity::{ChatMessage, Message, NewMessage};
use crate::domain::group::GroupId;
use crate::domain::storage::Page;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for group chat messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to the chat of the membership's group
    async fn append(&self, message: NewMessage) -> Result<Message, DomainError>;

    /// Messages of a group, newest first
    async fn list(&self, group_id: GroupId, page: Page) -> Result<Vec<ChatMessage>, DomainError>;
}
