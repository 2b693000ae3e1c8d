use axum::{http::StatusCode, Json};
use tracing::error;

use super::dto::ErrorResponseDto;
use crate::domain::errors::{ErrorKind, ListingError};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponseDto>);

/// Convert domain ListingError to HTTP status codes for API responses
impl From<&ListingError> for StatusCode {
    fn from(err: &ListingError) -> Self {
        match err {
            ListingError::Validation { .. }
            | ListingError::CapacityExceeded { .. }
            | ListingError::InvalidIndex { .. }
            | ListingError::LastImage
            | ListingError::InvalidTransition { .. }
            | ListingError::ListingSold
            | ListingError::ListingRemoved
            | ListingError::BlockingTransaction { .. } => StatusCode::BAD_REQUEST,
            ListingError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ListingError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ListingError::NotFound { .. } => StatusCode::NOT_FOUND,
            ListingError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            ListingError::Storage(_) | ListingError::Repository { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ErrorResponseDto {
    /// Render a domain error. Server errors keep their detail out of the
    /// response; it goes to the log instead.
    pub fn from_listing_error(err: &ListingError) -> Self {
        let kind = err.kind();
        let detail = match kind {
            ErrorKind::Server => "Internal server error".to_string(),
            _ => err.to_string(),
        };
        Self::new(kind.as_str(), detail)
    }
}

/// Map a domain error onto the HTTP response pair
pub fn api_error(err: ListingError) -> ApiError {
    let status = StatusCode::from(&err);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }
    (status, Json(ErrorResponseDto::from_listing_error(&err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        errors::StorageError,
        models::{ListingStatus, TransactionStatus},
        value_objects::ListingId,
    };

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ListingError::validation("bad"), StatusCode::BAD_REQUEST),
            (ListingError::LastImage, StatusCode::BAD_REQUEST),
            (
                ListingError::InvalidTransition {
                    from: ListingStatus::Sold,
                    to: ListingStatus::Active,
                },
                StatusCode::BAD_REQUEST,
            ),
            (ListingError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ListingError::forbidden("no"), StatusCode::FORBIDDEN),
            (
                ListingError::NotFound {
                    listing_id: ListingId::generate(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ListingError::BlockingTransaction {
                    status: TransactionStatus::Escrow,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ListingError::ConcurrentModification {
                    listing_id: ListingId::generate(),
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(StatusCode::from(&err), expected, "{}", err);
        }
    }

    #[test]
    fn test_server_errors_are_redacted() {
        let err = ListingError::Storage(StorageError::InfrastructureError {
            message: "connection refused to 10.0.0.5".to_string(),
            source: None,
        });
        let (status, Json(body)) = api_error(err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.kind, "server_error");
        assert_eq!(body.detail, "Internal server error");
    }

    #[test]
    fn test_blocking_transaction_is_tagged_conflict() {
        let (_, Json(body)) = api_error(ListingError::BlockingTransaction {
            status: TransactionStatus::Escrow,
        });
        assert_eq!(body.kind, "conflict");
    }
}
