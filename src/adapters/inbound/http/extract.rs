use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::{api_error, ApiError};
use crate::domain::{errors::ListingError, value_objects::UserId};

/// Header carrying the authenticated user id, set by the upstream gateway
pub const CALLER_HEADER: &str = "x-user-id";

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| UserId::parse(value).ok())
            .map(Caller)
            .ok_or_else(|| api_error(ListingError::Unauthenticated))
    }
}
