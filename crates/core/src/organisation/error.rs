use thiserror::Error;

/// Errors that can occur when validating an organisation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrganisationError {
    #[error("Organisation name must be at least 3 characters long")]
    NameTooShort,
    #[error("Organisation name '{0}' does not produce a valid slug")]
    EmptySlug(String),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
