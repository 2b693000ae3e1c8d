use thiserror::Error;

use crate::domain::value_objects::ListingId;

/// Failures surfaced by listing persistence.
///
/// `NotFound` and `VersionConflict` are kept apart from backend failures so
/// callers can tell a raced deletion or a stale write from a broken database.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Listing not found: {id}")]
    NotFound { id: ListingId },

    #[error("Listing {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        id: ListingId,
        expected: i64,
        actual: i64,
    },

    #[error("Repository backend error: {message}")]
    Backend { message: String },
}

impl RepositoryError {
    pub fn backend(message: impl Into<String>) -> Self {
        RepositoryError::Backend {
            message: message.into(),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
