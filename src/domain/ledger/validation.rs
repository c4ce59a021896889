//! Ledger input validation

use thiserror::Error;

/// Errors that can occur while validating an operation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerValidationError {
    #[error("operation type must be one of ('income', 'spending'), but not '{0}'")]
    UnknownKind(String),

    #[error("amount must be a decimal number (but is '{0}')")]
    NotANumber(String),

    #[error("amount must be positive (but is {0})")]
    NonPositiveAmount(String),

    #[error("operation name cannot be empty")]
    EmptyName,

    #[error("operation name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("operation description cannot exceed {0} characters")]
    DescriptionTooLong(usize),

    #[error("operation would overflow the group balance")]
    BalanceOverflow,
}

const MAX_OPERATION_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Validate the name and description of an operation
pub fn validate_operation_text(name: &str, description: &str) -> Result<(), LedgerValidationError> {
    if name.trim().is_empty() {
        return Err(LedgerValidationError::EmptyName);
    }

    if name.chars().count() > MAX_OPERATION_NAME_LENGTH {
        return Err(LedgerValidationError::NameTooLong(MAX_OPERATION_NAME_LENGTH));
    }

    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(LedgerValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text() {
        assert!(validate_operation_text("Groceries", "").is_ok());
        assert!(validate_operation_text("Fuel", "half a tank").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            validate_operation_text("  ", "desc"),
            Err(LedgerValidationError::EmptyName)
        );
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            validate_operation_text(&"n".repeat(101), ""),
            Err(LedgerValidationError::NameTooLong(100))
        );
        assert_eq!(
            validate_operation_text("ok", &"d".repeat(1001)),
            Err(LedgerValidationError::DescriptionTooLong(1000))
        );
    }
}
