//! Services orchestrating the repositories and the existence cache.
//!
//! Every existence check goes through [`IdSetCache::contains`]: the cached ID
//! set answers when present, otherwise the repository is asked for the full
//! set, which is written back for the next caller. Creates and deletes drop
//! the affected set; field-only updates leave it alone.

mod error;
mod http_mapping;
mod id_set;
mod organisation;
mod user;

#[cfg(test)]
mod test_support;

pub use error::{Result, ServiceError};
pub use http_mapping::service_error_to_status_code;
pub use id_set::{IdSetCache, DEFAULT_CACHE_TIMEOUT};
pub use organisation::OrganisationService;
pub use user::UserService;
