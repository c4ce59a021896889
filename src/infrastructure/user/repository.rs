//! In-memory user repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryDatabase::new()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        if tables.users.values().any(|u| u.username() == user.username) {
            return Err(DomainError::conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }

        let id = tables.next_user_id();
        let user = user.into_user(id);
        tables.users.insert(id, user.clone());

        Ok(user)
    }
}
