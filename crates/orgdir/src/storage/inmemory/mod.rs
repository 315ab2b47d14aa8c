//! In-memory storage backend.
//!
//! Stores organisations and users in HashMaps wrapped in `Arc<RwLock<_>>`.
//! Nothing is persisted; useful for development and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use orgdir::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
