//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use orgdir_core::organisation::Organisation;
use orgdir_core::user::User;

/// Convert a SQLite row to an Organisation.
///
/// Expected columns: id, name, slug, email, is_active, created_at, updated_at
pub fn row_to_organisation(row: &Row) -> rusqlite::Result<Organisation> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Organisation {
        id: parse_uuid(&id)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        email: row.get(3)?,
        is_active: row.get(4)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a User.
///
/// Expected columns: id, organisation_id, first_name, last_name, email,
/// is_active, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let organisation_id: String = row.get(1)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(User {
        id: parse_uuid(&id)?,
        organisation_id: parse_uuid(&organisation_id)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        is_active: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a single-column row to a UUID.
pub fn row_to_uuid(row: &Row) -> rusqlite::Result<Uuid> {
    let id: String = row.get(0)?;
    parse_uuid(&id)
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
