//! Cache port and key layout.
//!
//! The cache only ever holds sets of IDs derived from repository state, so
//! every entry may be dropped at any time without losing data.

mod error;
mod keys;
mod traits;

pub use error::{CacheError, Result};
pub use keys::CacheKeyManager;
pub use traits::Cache;
