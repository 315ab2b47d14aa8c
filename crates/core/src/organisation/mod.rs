mod error;
mod operations;
mod requests;
mod types;

pub use error::OrganisationError;
pub use operations::{create_slug, validate_organisation, SLUG_MAX_LENGTH};
pub use requests::{CreateOrganisation, UpdateOrganisation};
pub use types::Organisation;
