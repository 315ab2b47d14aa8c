mod error;
mod operations;
mod requests;
mod types;

pub use error::UserError;
pub use operations::validate_user;
pub use requests::{CreateUser, UpdateUser};
pub use types::User;
