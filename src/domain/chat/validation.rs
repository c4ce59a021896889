//! Chat message validation

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessageValidationError {
    #[error("message cannot be empty")]
    Empty,

    #[error("message cannot exceed {0} characters")]
    TooLong(usize),
}

const MAX_MESSAGE_LENGTH: usize = 4000;

pub fn validate_message_text(text: &str) -> Result<(), MessageValidationError> {
    if text.trim().is_empty() {
        return Err(MessageValidationError::Empty);
    }

    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(MessageValidationError::TooLong(MAX_MESSAGE_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text() {
        assert!(validate_message_text("hi all").is_ok());
        assert_eq!(validate_message_text(""), Err(MessageValidationError::Empty));
        assert_eq!(validate_message_text(" \n"), Err(MessageValidationError::Empty));
        assert_eq!(
            validate_message_text(&"m".repeat(4001)),
            Err(MessageValidationError::TooLong(4000))
        );
    }
}
