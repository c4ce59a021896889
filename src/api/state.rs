//! Application state for shared services

use std::sync::Arc;

use crate::domain::storage::StoreProbe;
use crate::infrastructure::chat::ChatService;
use crate::infrastructure::group::GroupService;
use crate::infrastructure::ledger::LedgerService;
use crate::infrastructure::membership::MembershipService;
use crate::infrastructure::storage::Repositories;
use crate::infrastructure::user::{Argon2Hasher, UserService};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub group_service: Arc<GroupService>,
    pub membership_service: Arc<MembershipService>,
    pub ledger_service: Arc<LedgerService>,
    pub chat_service: Arc<ChatService>,
    pub store: Arc<dyn StoreProbe>,
}

impl AppState {
    /// Wire every service to one repository set
    pub fn new(repos: Repositories) -> Self {
        Self {
            user_service: Arc::new(UserService::new(
                repos.users.clone(),
                Arc::new(Argon2Hasher::new()),
            )),
            group_service: Arc::new(GroupService::new(
                repos.groups.clone(),
                repos.memberships.clone(),
                repos.users.clone(),
            )),
            membership_service: Arc::new(MembershipService::new(
                repos.memberships.clone(),
                repos.groups.clone(),
                repos.users.clone(),
            )),
            ledger_service: Arc::new(LedgerService::new(
                repos.ledger.clone(),
                repos.groups.clone(),
                repos.memberships.clone(),
                repos.users.clone(),
            )),
            chat_service: Arc::new(ChatService::new(
                repos.messages.clone(),
                repos.groups.clone(),
                repos.memberships.clone(),
                repos.users.clone(),
            )),
            store: repos.probe,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory())
    }
}
