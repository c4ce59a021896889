//! User repository trait

use async_trait::async_trait;

use super::entity::{NewUser, User, UserId};
use super::user_ref::UserRef;
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by id
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user; a taken username is a `Conflict`
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Resolve a client-supplied reference with the matching statement shape
    async fn resolve(&self, user: &UserRef) -> Result<Option<User>, DomainError> {
        match user {
            UserRef::ById(id) => self.get(*id).await,
            UserRef::ByName(name) => self.get_by_username(name).await,
        }
    }
}
