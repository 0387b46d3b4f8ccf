pub mod error;
pub use error::{ApiError, ErrorMessage, StorageError};

pub mod bucket;
pub mod users;
pub mod auth;

#[cfg(feature = "client")]
pub mod client;
