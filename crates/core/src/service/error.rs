use thiserror::Error;
use uuid::Uuid;

use crate::organisation::OrganisationError;
use crate::storage::RepositoryError;
use crate::user::UserError;

/// Errors returned by the organisation and user services.
///
/// Cache failures never appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity_type} with ID '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} with {field} '{key}' already exists")]
    AlreadyExists {
        entity_type: &'static str,
        field: &'static str,
        key: String,
    },
    #[error("{entity_type} validation error: {message}")]
    Validation {
        entity_type: &'static str,
        message: String,
    },
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn organisation_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Organisation",
            id: id.to_string(),
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "User",
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            // The row vanished after a stale cached ID set let the call through.
            RepositoryError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            // A unique constraint fired after the service-level check passed.
            RepositoryError::AlreadyExists { entity_type, id } => Self::AlreadyExists {
                entity_type,
                field: "key",
                key: id,
            },
            other => Self::Repository(other),
        }
    }
}

impl From<OrganisationError> for ServiceError {
    fn from(error: OrganisationError) -> Self {
        Self::Validation {
            entity_type: "Organisation",
            message: error.to_string(),
        }
    }
}

impl From<UserError> for ServiceError {
    fn from(error: UserError) -> Self {
        Self::Validation {
            entity_type: "User",
            message: error.to_string(),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
