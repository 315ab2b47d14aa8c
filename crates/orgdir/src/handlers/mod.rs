pub mod auth;
pub mod error;
pub mod health;
pub mod organisations;
pub mod users;

pub use error::AppError;
