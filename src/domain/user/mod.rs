//! User domain
//!
//! Registered users, the validation rules for usernames and passwords, and
//! the `UserRef` tagged union used to address a user by id or by name.

mod entity;
mod repository;
mod user_ref;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use user_ref::UserRef;
pub use validation::{validate_password, validate_username, UserValidationError};
