//! Client-side form validation
//!
//! These checks run before any request is built; a failure never reaches
//! the network.

use thiserror::Error;

/// Reasons a form submission is refused locally
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your email address and password")]
    MissingCredentials,

    #[error("Please fill in all fields")]
    MissingRegistrationFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a title")]
    EmptyTitle,
}

/// Login requires both fields
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Registration requires all fields and a matching confirmation
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(ValidationError::MissingRegistrationFields);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// A todo title must contain something other than whitespace
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(
            validate_login("", "secret"),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            validate_login("me@example.com", ""),
            Err(ValidationError::MissingCredentials)
        );
        assert!(validate_login("me@example.com", "secret").is_ok());
    }

    #[test]
    fn test_registration_checks_order() {
        // Missing fields are reported before a mismatch
        assert_eq!(
            validate_registration("me@example.com", "a", ""),
            Err(ValidationError::MissingRegistrationFields)
        );
        assert_eq!(
            validate_registration("me@example.com", "a", "b"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_registration("me@example.com", "a", "a").is_ok());
    }

    #[test]
    fn test_title_must_not_be_blank() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" \t "), Err(ValidationError::EmptyTitle));
        assert!(validate_title(" Buy milk ").is_ok());
    }
}
