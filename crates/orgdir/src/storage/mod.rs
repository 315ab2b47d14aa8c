//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `orgdir_core::storage`. The backend is picked at runtime from
//! [`StorageBackend`]; SQLite is only available when the `sqlite` feature is
//! compiled in.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available.

use std::sync::Arc;

use anyhow::Result;

use orgdir_core::storage::{OrganisationRepository, UserRepository};

use crate::config::{Config, StorageBackend};

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

/// Both repository ports, backed by the same store.
pub type Repositories = (Arc<dyn OrganisationRepository>, Arc<dyn UserRepository>);

/// Builds the repositories for the storage backend selected in `config`.
pub async fn build_repositories(config: &Config) -> Result<Repositories> {
    let repositories = match config.storage_backend {
        StorageBackend::Inmemory => {
            let repo = Arc::new(InMemoryRepository::new());
            (
                repo.clone() as Arc<dyn OrganisationRepository>,
                repo as Arc<dyn UserRepository>,
            )
        }
        StorageBackend::Sqlite => build_sqlite(config).await?,
    };

    tracing::info!(backend = %config.storage_backend, "Storage backend ready");
    Ok(repositories)
}

#[cfg(feature = "sqlite")]
async fn build_sqlite(config: &Config) -> Result<Repositories> {
    let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
    tracing::debug!(path = %config.sqlite_path, "Opened SQLite database");
    Ok((
        repo.clone() as Arc<dyn OrganisationRepository>,
        repo as Arc<dyn UserRepository>,
    ))
}

#[cfg(not(feature = "sqlite"))]
async fn build_sqlite(_config: &Config) -> Result<Repositories> {
    anyhow::bail!("storage backend 'sqlite' is not available: rebuild with the 'sqlite' feature")
}
