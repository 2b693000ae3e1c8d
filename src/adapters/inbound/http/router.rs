use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    add_images, browse_listings, change_status, create_listing, delete_listing, get_listing,
    list_user_listings, remove_image, update_listing,
};
use crate::{ports::services::ListingService, services::ListingPolicy};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<dyn ListingService>,
    /// Largest accepted request body in bytes
    pub body_limit: usize,
}

impl AppState {
    pub fn new(listing_service: Arc<dyn ListingService>, policy: &ListingPolicy) -> Self {
        Self {
            listing_service,
            body_limit: policy.request_body_limit(),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Create the listing routes without state, for nesting
pub fn create_listing_router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse_listings).post(create_listing))
        .route("/users/{user_id}/listings", get(list_user_listings))
        .route(
            "/{id}",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
        .route("/{id}/images", post(add_images))
        .route("/{id}/images/{index}", delete(remove_image))
        .route("/{id}/status", patch(change_status))
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit;

    Router::new()
        .route("/health", get(health))
        .nest("/listings", create_listing_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::{
            persistence::{
                InMemoryListingRepository, InMemorySellerRepository,
                InMemoryTransactionRepository,
            },
            storage::ApacheObjectStoreAdapter,
        },
        services::ListingServiceImpl,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use object_store::memory::InMemory;

    fn create_test_app_state() -> AppState {
        let policy = ListingPolicy::default();
        let service = ListingServiceImpl::new(
            Arc::new(InMemoryListingRepository::new()),
            Arc::new(InMemoryTransactionRepository::new()),
            Arc::new(InMemorySellerRepository::new()),
            Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()))),
            policy.clone(),
        );
        AppState::new(Arc::new(service), &policy)
    }

    #[tokio::test]
    async fn test_health() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_unknown_listing_is_404() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server
            .get(&format!("/listings/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["type"], "not_found");
    }

    #[tokio::test]
    async fn test_mutation_without_caller_is_401() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server
            .delete(&format!("/listings/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["type"], "auth_error");
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let app = create_router(create_test_app_state());
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/listings")
            .header("origin", "https://shop.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
