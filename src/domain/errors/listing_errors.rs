use thiserror::Error;

use super::{RepositoryError, StorageError, ValidationError};
use crate::domain::{
    models::{ListingStatus, TransactionStatus},
    value_objects::ListingId,
};

/// Category of a listing failure, as reported to callers in the `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Forbidden,
    NotFound,
    Conflict,
    Server,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Auth => "auth_error",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Server => "server_error",
        }
    }
}

/// Errors raised by the listing lifecycle operations
#[derive(Debug, Clone, Error)]
pub enum ListingError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Maximum {max} images allowed per listing ({current} attached, {requested} requested)")]
    CapacityExceeded {
        current: usize,
        requested: usize,
        max: usize,
    },

    #[error("Invalid image index {index} (listing has {len} images)")]
    InvalidIndex { index: String, len: usize },

    #[error("Listing must have at least one image")]
    LastImage,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    #[error("Cannot update sold listings")]
    ListingSold,

    #[error("Cannot modify removed listings")]
    ListingRemoved,

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Listing not found: {listing_id}")]
    NotFound { listing_id: ListingId },

    #[error("Cannot delete listing with an active transaction ({status})")]
    BlockingTransaction { status: TransactionStatus },

    #[error("Listing {listing_id} was modified concurrently, retry the request")]
    ConcurrentModification { listing_id: ListingId },

    #[error("Storage failure: {0}")]
    Storage(StorageError),

    #[error("Repository failure: {message}")]
    Repository { message: String },
}

impl ListingError {
    pub fn validation(message: impl Into<String>) -> Self {
        ListingError::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ListingError::Forbidden {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ListingError::Validation { .. }
            | ListingError::CapacityExceeded { .. }
            | ListingError::InvalidIndex { .. }
            | ListingError::LastImage
            | ListingError::InvalidTransition { .. }
            | ListingError::ListingSold
            | ListingError::ListingRemoved => ErrorKind::Validation,
            ListingError::Unauthenticated => ErrorKind::Auth,
            ListingError::Forbidden { .. } => ErrorKind::Forbidden,
            ListingError::NotFound { .. } => ErrorKind::NotFound,
            ListingError::BlockingTransaction { .. }
            | ListingError::ConcurrentModification { .. } => ErrorKind::Conflict,
            ListingError::Storage(_) | ListingError::Repository { .. } => ErrorKind::Server,
        }
    }
}

impl From<ValidationError> for ListingError {
    fn from(err: ValidationError) -> Self {
        ListingError::Validation {
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for ListingError {
    fn from(err: StorageError) -> Self {
        ListingError::Storage(err)
    }
}

impl From<RepositoryError> for ListingError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => ListingError::NotFound { listing_id: id },
            RepositoryError::VersionConflict { id, .. } => {
                ListingError::ConcurrentModification { listing_id: id }
            }
            RepositoryError::Backend { message } => ListingError::Repository { message },
        }
    }
}

/// Result type for listing operations
pub type ListingResult<T> = Result<T, ListingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_keep_not_found_apart() {
        let id = ListingId::generate();
        let err: ListingError = RepositoryError::NotFound { id }.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ListingError = RepositoryError::backend("connection reset").into();
        assert_eq!(err.kind(), ErrorKind::Server);

        let err: ListingError = RepositoryError::VersionConflict {
            id,
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_transition_error_names_both_states() {
        let err = ListingError::InvalidTransition {
            from: ListingStatus::Removed,
            to: ListingStatus::Active,
        };
        assert_eq!(err.to_string(), "Invalid status transition: REMOVED -> ACTIVE");
        assert_eq!(err.kind().as_str(), "validation_error");
    }
}
