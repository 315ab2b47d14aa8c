//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`.

use orgdir_core::storage::RepositoryError;
use rusqlite::ffi;

/// Maps a rusqlite error to a RepositoryError.
///
/// - UNIQUE / PRIMARY KEY constraint -> `AlreadyExists`
/// - FOREIGN KEY constraint -> `InvalidData`
/// - cannot open / busy / locked -> `ConnectionFailed`
/// - no rows -> `NotFound`
/// - column conversion failure -> `InvalidData`
/// - everything else -> `QueryFailed`
fn map_rusqlite_error(
    err: &rusqlite::Error,
    entity_type: &'static str,
    id: Option<&str>,
) -> RepositoryError {
    let key = || id.unwrap_or("unknown").to_string();

    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _) => match sqlite_err.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                RepositoryError::AlreadyExists {
                    entity_type,
                    id: key(),
                }
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepositoryError::InvalidData(format!(
                "Foreign key constraint violation for {entity_type}"
            )),
            _ => match sqlite_err.code {
                rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DatabaseLocked => {
                    RepositoryError::ConnectionFailed(err.to_string())
                }
                _ => RepositoryError::QueryFailed(err.to_string()),
            },
        },
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: key(),
        },
        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            RepositoryError::InvalidData(err.to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

fn map_tokio_rusqlite(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: Option<&str>,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, id)
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    map_tokio_rusqlite(err, entity_type, None)
}

/// Maps a tokio_rusqlite error to a RepositoryError, naming the offending
/// key (an ID, a name or an email) in `NotFound` and `AlreadyExists`.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id = id.into();
    map_tokio_rusqlite(err, entity_type, Some(&id))
}
