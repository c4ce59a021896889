//! Group validation

use thiserror::Error;

/// Errors that can occur during group validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GroupValidationError {
    #[error("group name cannot be empty")]
    EmptyName,

    #[error("group name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_GROUP_NAME_LENGTH: usize = 100;

/// Validate a group name
pub fn validate_group_name(name: &str) -> Result<(), GroupValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(GroupValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(GroupValidationError::NameTooLong(MAX_GROUP_NAME_LENGTH));
    }

    Ok(())
}
