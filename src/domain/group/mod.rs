//! Group domain

mod entity;
mod repository;
mod validation;

pub use entity::{Group, GroupId, GroupView, UserGroupSummary};
pub use repository::GroupRepository;
pub use validation::{validate_group_name, GroupValidationError};
