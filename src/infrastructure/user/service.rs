//! User service for registration and authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_password, validate_username, NewUser, User, UserId, UserRef, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::access::require_user;

use super::password::PasswordHasher;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user with a hashed password
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .repository
            .create(NewUser::new(username, password_hash))
            .await?;

        info!(user_id = %user.id(), username = %user.username(), "Registered user");
        Ok(user)
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self.repository.get_by_username(username).await?;

        match user {
            Some(user) if self.hasher.verify(password, user.password_hash()) => {
                debug!(user_id = %user.id(), "Authenticated user");
                Ok(user)
            }
            _ => Err(DomainError::forbidden("wrong username or password")),
        }
    }

    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    pub async fn resolve(&self, user: &UserRef) -> Result<User, DomainError> {
        require_user(self.repository.as_ref(), user).await
    }
}
