use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use super::{
    listing_handlers::{listing_id, HandlerResult},
    multipart::read_multipart,
};
use crate::{
    adapters::inbound::http::{
        dto::ImagesResponseDto, error::api_error, extract::Caller, router::AppState,
    },
    domain::errors::ListingError,
};

/// Handle appending images to a listing
pub async fn add_images(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    multipart: Multipart,
) -> HandlerResult<ImagesResponseDto> {
    let id = listing_id(&id)?;
    let payload = read_multipart(multipart).await.map_err(api_error)?;

    let images = app_state
        .listing_service
        .add_images(id, caller, payload.images)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(ImagesResponseDto::new(images))))
}

/// Handle removing the image at a position
pub async fn remove_image(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    Path((id, index)): Path<(String, String)>,
) -> HandlerResult<ImagesResponseDto> {
    let id = listing_id(&id)?;
    let index = index.trim().parse::<usize>().map_err(|_| {
        api_error(ListingError::validation(format!(
            "Invalid image index {}",
            index
        )))
    })?;

    let images = app_state
        .listing_service
        .remove_image(id, caller, index)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(ImagesResponseDto::new(images))))
}
