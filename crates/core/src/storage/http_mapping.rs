//! Pure mapping from repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `ConnectionFailed` -> 503
/// - `QueryFailed` -> 500
/// - `InvalidData` -> 500
///
/// `InvalidData` means stored data could not be decoded, which is a server
/// fault rather than a client one.
///
/// # Examples
///
/// ```
/// use orgdir_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Organisation",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}
