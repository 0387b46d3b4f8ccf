pub mod error;
pub mod validation;
pub mod query;
pub mod path;
pub mod assets;
