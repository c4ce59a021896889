//! Chat message entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::membership::MembershipId;
use crate::domain::user::UserId;

/// Store-assigned message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message about to be appended to a group chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub membership_id: MembershipId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(membership_id: MembershipId, text: impl Into<String>) -> Self {
        Self {
            membership_id,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            membership_id: self.membership_id,
            text: self.text,
            sent_at: self.sent_at,
        }
    }
}

/// A stored chat message; the author is addressed through the membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub membership_id: MembershipId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// A message as shown to readers of the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub username: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}
