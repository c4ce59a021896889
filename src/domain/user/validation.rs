//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("username must be at least {0} characters long")]
    UsernameTooShort(usize),

    #[error("username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("username must contain at least one letter or other symbol")]
    NumericUsername,

    #[error("username contains illegal character: '{0}'")]
    IllegalUsernameCharacter(char),

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_PASSWORD_LENGTH: usize = 128;
const ILLEGAL_USERNAME_CHARACTERS: [char; 3] = ['/', '&', ' '];

/// Validate a username
///
/// Rules:
/// - At least 2 and at most 50 characters
/// - Not made of digits only, so it can never be mistaken for a user id
/// - No `/`, `&` or space, which would break path and query parameters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if username.chars().all(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::NumericUsername);
    }

    if let Some(c) = username
        .chars()
        .find(|c| ILLEGAL_USERNAME_CHARACTERS.contains(c))
    {
        return Err(UserValidationError::IllegalUsernameCharacter(c));
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bo").is_ok());
        assert!(validate_username("user_1").is_ok());
        assert!(validate_username("1a").is_ok());
    }

    #[test]
    fn test_username_too_short() {
        assert_eq!(
            validate_username("a"),
            Err(UserValidationError::UsernameTooShort(2))
        );
        assert_eq!(
            validate_username(""),
            Err(UserValidationError::UsernameTooShort(2))
        );
    }

    #[test]
    fn test_username_too_long() {
        let long_username = "a".repeat(51);
        assert_eq!(
            validate_username(&long_username),
            Err(UserValidationError::UsernameTooLong(50))
        );
    }

    #[test]
    fn test_numeric_username() {
        assert_eq!(
            validate_username("12345"),
            Err(UserValidationError::NumericUsername)
        );
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            validate_username("al/ice"),
            Err(UserValidationError::IllegalUsernameCharacter('/'))
        );
        assert_eq!(
            validate_username("tom&jerry"),
            Err(UserValidationError::IllegalUsernameCharacter('&'))
        );
        assert_eq!(
            validate_username("john doe"),
            Err(UserValidationError::IllegalUsernameCharacter(' '))
        );
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("x").is_ok());
        assert_eq!(validate_password(""), Err(UserValidationError::EmptyPassword));
        assert_eq!(
            validate_password(&"p".repeat(129)),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }
}
