pub mod errors;
pub mod models;
pub mod value_objects;

pub use errors::{ListingError, ListingResult, RepositoryError, StorageError, ValidationError};
pub use models::*;
pub use value_objects::*;
