//! SQLite repository implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use rusqlite::params;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use orgdir_core::organisation::Organisation;
use orgdir_core::storage::{OrganisationRepository, RepositoryError, Result, UserRepository};
use orgdir_core::user::User;

use super::conversions::{format_datetime, row_to_organisation, row_to_user, row_to_uuid};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Runs a query expected to return at most one row.
fn query_optional<T>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<Option<T>, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    match stmt.query_row(params, map) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(wrap_err(e)),
    }
}

/// Runs a query and collects every row.
fn query_all<T, C: FromIterator<T>>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<C, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    let rows = stmt.query_map(params, map).map_err(wrap_err)?;
    rows.collect::<rusqlite::Result<C>>().map_err(wrap_err)
}

/// Runs an `EXISTS(...)` query.
fn query_exists(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> std::result::Result<bool, tokio_rusqlite::Error> {
    conn.query_row(sql, params, |row| row.get(0)).map_err(wrap_err)
}

/// SQLite-based repository for organisations and users.
///
/// One connection is shared by all operations; `tokio-rusqlite` runs each
/// call on its background thread.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and applies the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// OrganisationRepository implementation
// ============================================================================

#[async_trait]
impl OrganisationRepository for SqliteRepository {
    async fn organisation_exists(&self, id: Uuid) -> Result<bool> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| query_exists(conn, schema::ORGANISATION_EXISTS, [&id_str]))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Organisation", id.to_string()))
    }

    async fn get_organisations(&self) -> Result<Vec<Organisation>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ORGANISATIONS, [], row_to_organisation))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Organisation"))
    }

    async fn get_organisation_ids(&self) -> Result<HashSet<Uuid>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ORGANISATION_IDS, [], row_to_uuid))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Organisation"))
    }

    async fn get_organisation(&self, id: Uuid) -> Result<Option<Organisation>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_ORGANISATION_BY_ID,
                    [&id_str],
                    row_to_organisation,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Organisation", id.to_string()))
    }

    async fn get_organisation_by_slug(&self, slug: &str) -> Result<Option<Organisation>> {
        let slug = slug.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_ORGANISATION_BY_SLUG,
                    [&slug],
                    row_to_organisation,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Organisation"))
    }

    async fn get_organisation_by_name(&self, name: &str) -> Result<Option<Organisation>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_ORGANISATION_BY_NAME,
                    [&name],
                    row_to_organisation,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Organisation"))
    }

    async fn upsert_organisation(&self, organisation: &Organisation) -> Result<()> {
        let id = organisation.id.to_string();
        let name = organisation.name.clone();
        let slug = organisation.slug.clone();
        let email = organisation.email.clone();
        let is_active = organisation.is_active;
        let created_at = format_datetime(&organisation.created_at);
        let updated_at = format_datetime(&organisation.updated_at);
        let conflict_key = organisation.name.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_ORGANISATION,
                    params![id, name, slug, email, is_active, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Organisation", conflict_key))
    }

    async fn delete_organisation(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ORGANISATION, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Organisation", id.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_users(&self, organisation_id: Uuid) -> Result<Vec<User>> {
        let organisation_id = organisation_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_USERS_BY_ORGANISATION,
                    [&organisation_id],
                    row_to_user,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn get_user_ids(&self, organisation_id: Uuid) -> Result<HashSet<Uuid>> {
        let organisation_id = organisation_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_USER_IDS_BY_ORGANISATION,
                    [&organisation_id],
                    row_to_uuid,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn get_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<Option<User>> {
        let organisation_id_str = organisation_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_USER_BY_ID,
                    [&organisation_id_str, &user_id_str],
                    row_to_user,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id.to_string()))
    }

    async fn get_user_by_email(
        &self,
        organisation_id: Uuid,
        email: &str,
    ) -> Result<Option<User>> {
        let organisation_id_str = organisation_id.to_string();
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_USER_BY_EMAIL,
                    [&organisation_id_str, &email],
                    row_to_user,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn user_exists(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let organisation_id_str = organisation_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_exists(
                    conn,
                    schema::USER_EXISTS,
                    [&organisation_id_str, &user_id_str],
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id.to_string()))
    }

    async fn user_email_is_available(&self, organisation_id: Uuid, email: &str) -> Result<bool> {
        let organisation_id_str = organisation_id.to_string();
        let email = email.to_string();

        let taken = self
            .conn
            .call(move |conn| {
                query_exists(conn, schema::USER_EMAIL_TAKEN, [&organisation_id_str, &email])
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))?;
        Ok(!taken)
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let organisation_id = user.organisation_id.to_string();
        let first_name = user.first_name.clone();
        let last_name = user.last_name.clone();
        let email = user.email.clone();
        let is_active = user.is_active;
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let conflict_key = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_USER,
                    params![
                        id,
                        organisation_id,
                        first_name,
                        last_name,
                        email,
                        is_active,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", conflict_key))
    }

    async fn delete_user(&self, organisation_id: Uuid, user_id: Uuid) -> Result<()> {
        let organisation_id_str = organisation_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&organisation_id_str, &user_id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id.to_string()))
    }
}
