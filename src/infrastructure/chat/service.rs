//! Chat service

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::chat::{
    validate_message_text, ChatMessage, Message, MessageRepository, NewMessage,
};
use crate::domain::group::{GroupId, GroupRepository};
use crate::domain::membership::MembershipRepository;
use crate::domain::storage::Page;
use crate::domain::user::{UserRef, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::access::{require_active_membership, require_group, require_user};

pub struct ChatService {
    messages: Arc<dyn MessageRepository>,
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl ChatService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            messages,
            groups,
            memberships,
            users,
        }
    }

    /// Post a message; only active members may write
    pub async fn post_message(
        &self,
        group_id: GroupId,
        user: &UserRef,
        text: &str,
    ) -> Result<Message, DomainError> {
        validate_message_text(text).map_err(|e| DomainError::validation(e.to_string()))?;

        let user = require_user(self.users.as_ref(), user).await?;
        let group = require_group(self.groups.as_ref(), group_id).await?;
        let membership =
            require_active_membership(self.memberships.as_ref(), &group, &user).await?;

        let message = self
            .messages
            .append(NewMessage::new(membership.id, text))
            .await?;

        info!(
            group_id = %group.id,
            user_id = %user.id(),
            message_id = %message.id,
            "Posted chat message"
        );

        Ok(message)
    }

    /// Newest messages first. Any membership, pending or blocked included,
    /// may read.
    pub async fn get_messages(
        &self,
        group_id: GroupId,
        user: &UserRef,
        page: Page,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let user = require_user(self.users.as_ref(), user).await?;
        let group = require_group(self.groups.as_ref(), group_id).await?;

        if self.memberships.find(group.id, user.id()).await?.is_none() {
            return Err(DomainError::unauthorized(format!(
                "user ({}) is not in the given group ({})",
                user.username(),
                group.id
            )));
        }

        let messages = self.messages.list(group.id, page).await?;

        debug!(group_id = %group.id, count = messages.len(), "Listed chat messages");
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{MessageId, MockMessageRepository};
    use crate::domain::user::NewUser;
    use crate::infrastructure::storage::Repositories;

    async fn setup(repos: &Repositories) -> GroupId {
        for name in ["alice", "bob", "carol"] {
            repos.users.create(NewUser::new(name, "hash")).await.unwrap();
        }
        let alice = repos.users.get_by_username("alice").await.unwrap().unwrap();
        let bob = repos.users.get_by_username("bob").await.unwrap().unwrap();
        let (group, _) = repos.groups.create("Trip", alice.id()).await.unwrap();
        repos.memberships.request_join(group.id, bob.id()).await.unwrap();
        group.id
    }

    fn service_for(repos: &Repositories) -> ChatService {
        ChatService::new(
            repos.messages.clone(),
            repos.groups.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
        )
    }

    #[tokio::test]
    async fn test_messages_are_newest_first() {
        let repos = Repositories::in_memory();
        let group_id = setup(&repos).await;
        let service = service_for(&repos);

        for text in ["first", "second", "third"] {
            service
                .post_message(group_id, &UserRef::name("alice"), text)
                .await
                .unwrap();
        }

        let messages = service
            .get_messages(group_id, &UserRef::name("alice"), Page::default())
            .await
            .unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["third", "second", "first"]);
        assert_eq!(messages[0].username, "alice");

        let next_page = service
            .get_messages(group_id, &UserRef::name("alice"), Page::new(1))
            .await
            .unwrap();
        assert!(next_page.is_empty());
    }

    #[tokio::test]
    async fn test_pending_member_reads_but_cannot_post() {
        let repos = Repositories::in_memory();
        let group_id = setup(&repos).await;
        let service = service_for(&repos);

        let post = service
            .post_message(group_id, &UserRef::name("bob"), "hello")
            .await;
        assert!(matches!(post, Err(DomainError::Unauthorized { .. })));

        let read = service
            .get_messages(group_id, &UserRef::name("bob"), Page::default())
            .await;
        assert!(read.is_ok());

        let outsider = service
            .get_messages(group_id, &UserRef::name("carol"), Page::default())
            .await;
        assert!(matches!(outsider, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let repos = Repositories::in_memory();
        let group_id = setup(&repos).await;

        let mut messages = MockMessageRepository::new();
        messages.expect_append().never();

        let service = ChatService::new(
            Arc::new(messages),
            repos.groups.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
        );

        let result = service
            .post_message(group_id, &UserRef::name("alice"), "   ")
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_post_uses_the_author_membership() {
        let repos = Repositories::in_memory();
        let group_id = setup(&repos).await;
        let alice_membership = repos
            .memberships
            .find(group_id, crate::domain::user::UserId::new(1))
            .await
            .unwrap()
            .unwrap();

        let mut messages = MockMessageRepository::new();
        let expected = alice_membership.id;
        messages
            .expect_append()
            .withf(move |m| m.membership_id == expected && m.text == "hi")
            .times(1)
            .returning(|m| Ok(m.into_message(MessageId::new(9))));

        let service = ChatService::new(
            Arc::new(messages),
            repos.groups.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
        );

        let message = service
            .post_message(group_id, &UserRef::name("alice"), "hi")
            .await
            .unwrap();
        assert_eq!(message.id, MessageId::new(9));
    }
}
