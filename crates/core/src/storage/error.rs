use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_missing_organisation_names_its_id() {
        let id = Uuid::nil();
        let error = RepositoryError::NotFound {
            entity_type: "Organisation",
            id: id.to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Organisation not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_user_email_clash_names_the_email() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "john@doe.com".to_string(),
        };
        assert_eq!(error.to_string(), "User already exists: john@doe.com");
    }

    #[test]
    fn test_organisation_name_clash_names_the_name() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Organisation",
            id: "Acme Inc.".to_string(),
        };
        assert_eq!(error.to_string(), "Organisation already exists: Acme Inc.");
    }

    #[test]
    fn test_orphan_user_is_invalid_data() {
        let error =
            RepositoryError::InvalidData("Foreign key constraint violation for User".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: Foreign key constraint violation for User"
        );
    }

    #[test]
    fn test_backend_failures_keep_the_driver_message() {
        assert_eq!(
            RepositoryError::ConnectionFailed("unable to open database file".to_string())
                .to_string(),
            "Connection failed: unable to open database file"
        );
        assert_eq!(
            RepositoryError::QueryFailed("no such table: organisations".to_string()).to_string(),
            "Query failed: no such table: organisations"
        );
    }
}
