use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::multipart::read_multipart;
use crate::{
    adapters::inbound::http::{
        dto::{
            BrowseQueryDto, CreateListingForm, ListingPageResponseDto, ListingResponseDto,
            OkResponseDto, StatusChangeDto, UpdateListingDto, UserListingsQueryDto,
        },
        error::{api_error, ApiError},
        extract::Caller,
        router::AppState,
    },
    domain::{
        errors::ListingError,
        models::ListingStatus,
        value_objects::{ListingId, UserId},
    },
    ports::services::{BrowseListings, CreateListingInput, UpdateListingInput},
};

pub type HandlerResult<T> = Result<(StatusCode, Json<T>), ApiError>;

pub(super) fn listing_id(raw: &str) -> Result<ListingId, ApiError> {
    ListingId::parse(raw).map_err(|e| api_error(e.into()))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| api_error(ListingError::validation(e.body_text())))
}

/// Handle listing creation (multipart form with images)
pub async fn create_listing(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    multipart: Multipart,
) -> HandlerResult<ListingResponseDto> {
    let payload = read_multipart(multipart).await.map_err(api_error)?;
    let input = CreateListingInput::try_from(CreateListingForm {
        fields: payload.fields,
    })
    .map_err(api_error)?;

    let view = app_state
        .listing_service
        .create_listing(caller, input, payload.images)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(ListingResponseDto::new(view))))
}

/// Handle public listing retrieval; counts a view
pub async fn get_listing(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<ListingResponseDto> {
    let id = listing_id(&id)?;
    let view = app_state
        .listing_service
        .get_listing(id, true)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(ListingResponseDto::new(view))))
}

/// Handle partial listing update
pub async fn update_listing(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<UpdateListingDto>, JsonRejection>,
) -> HandlerResult<ListingResponseDto> {
    let id = listing_id(&id)?;
    let input = UpdateListingInput::try_from(json_body(payload)?).map_err(api_error)?;

    let view = app_state
        .listing_service
        .update_listing(id, caller, input)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(ListingResponseDto::new(view))))
}

/// Handle listing deletion
pub async fn delete_listing(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> HandlerResult<OkResponseDto> {
    let id = listing_id(&id)?;
    app_state
        .listing_service
        .delete_listing(id, caller)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(OkResponseDto::new())))
}

/// Handle public search
pub async fn browse_listings(
    State(app_state): State<AppState>,
    Query(query): Query<BrowseQueryDto>,
) -> HandlerResult<ListingPageResponseDto> {
    let params = BrowseListings::try_from(query).map_err(api_error)?;
    let page = app_state
        .listing_service
        .browse_listings(params)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(page.into())))
}

/// Handle listing of one seller's listings
pub async fn list_user_listings(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<UserListingsQueryDto>,
) -> HandlerResult<ListingPageResponseDto> {
    let seller = UserId::parse(&user_id).map_err(|e| api_error(e.into()))?;
    let (status, page, limit) = query.parse().map_err(api_error)?;

    let page = app_state
        .listing_service
        .list_user_listings(seller, status, page, limit)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(page.into())))
}

/// Handle status transition
pub async fn change_status(
    State(app_state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<StatusChangeDto>, JsonRejection>,
) -> HandlerResult<ListingResponseDto> {
    let id = listing_id(&id)?;
    let target: ListingStatus = json_body(payload)?
        .status
        .parse()
        .map_err(|e: crate::domain::errors::ValidationError| api_error(e.into()))?;

    let view = app_state
        .listing_service
        .change_status(id, caller, target)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::OK, Json(ListingResponseDto::new(view))))
}
