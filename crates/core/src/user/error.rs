use thiserror::Error;

/// Errors that can occur when validating a user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("First name must be at least 2 characters long")]
    FirstNameTooShort,
    #[error("Last name must be at least 2 characters long")]
    LastNameTooShort,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
