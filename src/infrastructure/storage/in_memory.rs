//! In-memory table set
//!
//! All in-memory repositories share one [`InMemoryDatabase`]. A write lock on
//! the table set plays the role of a store transaction, so multi-table writes
//! (group creation, recording an operation) are atomic here as well.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::chat::{Message, MessageId};
use crate::domain::group::{Group, GroupId};
use crate::domain::ledger::{Operation, OperationId};
use crate::domain::membership::{Membership, MembershipId};
use crate::domain::storage::StoreProbe;
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Per-table id sequences, starting at 1 like `BIGSERIAL`
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    groups: i64,
    memberships: i64,
    operations: i64,
    messages: i64,
}

fn bump(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Rows of every table, keyed and ordered by id
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<UserId, User>,
    pub groups: BTreeMap<GroupId, Group>,
    pub memberships: BTreeMap<MembershipId, Membership>,
    pub operations: BTreeMap<OperationId, Operation>,
    pub messages: BTreeMap<MessageId, Message>,
    sequences: Sequences,
}

impl Tables {
    pub fn next_user_id(&mut self) -> UserId {
        UserId::new(bump(&mut self.sequences.users))
    }

    pub fn next_group_id(&mut self) -> GroupId {
        GroupId::new(bump(&mut self.sequences.groups))
    }

    pub fn next_membership_id(&mut self) -> MembershipId {
        MembershipId::new(bump(&mut self.sequences.memberships))
    }

    pub fn next_operation_id(&mut self) -> OperationId {
        OperationId::new(bump(&mut self.sequences.operations))
    }

    pub fn next_message_id(&mut self) -> MessageId {
        MessageId::new(bump(&mut self.sequences.messages))
    }

    /// Username of a user, empty when the user row is gone
    pub fn username(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|user| user.username().to_string())
            .unwrap_or_default()
    }

    pub fn membership(&self, group_id: GroupId, user_id: UserId) -> Option<&Membership> {
        self.memberships
            .values()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
    }

    /// Sum of the signed amounts recorded for a group
    pub fn ledger_sum(&self, group_id: GroupId) -> Decimal {
        self.operations
            .values()
            .filter(|op| op.group_id == group_id)
            .map(|op| op.signed_amount())
            .sum()
    }

    /// Remove a group and every row that references it
    pub fn delete_group(&mut self, group_id: GroupId) -> bool {
        if self.groups.remove(&group_id).is_none() {
            return false;
        }

        let removed: Vec<MembershipId> = self
            .memberships
            .values()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.id)
            .collect();

        self.memberships.retain(|_, m| m.group_id != group_id);
        self.operations.retain(|_, op| op.group_id != group_id);
        self.messages
            .retain(|_, message| !removed.contains(&message.membership_id));

        true
    }
}

/// Process-local store used for development and tests
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[async_trait]
impl StoreProbe for InMemoryDatabase {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _tables = self.tables.read().await;
        Ok(())
    }
}
