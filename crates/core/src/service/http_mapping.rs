use crate::storage::repository_error_to_status_code;

use super::ServiceError;

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `Validation` -> 422
/// - `Repository` -> see [`repository_error_to_status_code`]
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound { .. } => 404,
        ServiceError::AlreadyExists { .. } => 409,
        ServiceError::Validation { .. } => 422,
        ServiceError::Repository(inner) => repository_error_to_status_code(inner),
    }
}
