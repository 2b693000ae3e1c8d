use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use listing_lifecycle_server::{
    adapters::inbound::http::CALLER_HEADER, create_in_memory_app, UserId,
};
use serde_json::{json, Value};

async fn setup_test_server() -> TestServer {
    let services = create_in_memory_app().await.unwrap();
    TestServer::new(services.router()).unwrap()
}

fn caller_header() -> HeaderName {
    HeaderName::from_static(CALLER_HEADER)
}

fn caller(user: UserId) -> HeaderValue {
    HeaderValue::from_str(&user.to_string()).unwrap()
}

fn image(name: &str) -> Part {
    Part::bytes(b"\xff\xd8\xff\xe0fake-jpeg".to_vec())
        .file_name(name.to_string())
        .mime_type("image/jpeg")
}

fn listing_form(status: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "Vintage 501 jeans")
        .add_text("description", "Classic straight leg, light fade")
        .add_text("brand", "Levi's")
        .add_text("category", "BOTTOMS")
        .add_text("condition", "EXCELLENT")
        .add_text("size", "W32 L32")
        .add_text("price", "25.00")
        .add_text("status", status)
        .add_part("images", image("front.jpg"))
}

async fn create_listing(server: &TestServer, seller: UserId, status: &str) -> String {
    let response = server
        .post("/listings")
        .add_header(caller_header(), caller(seller))
        .multipart(listing_form(status))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["listing"]["id"].as_str().unwrap().to_string()
}

fn assert_error(body: &Value, kind: &str) {
    assert_eq!(body["type"], kind, "unexpected error body: {}", body);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_http_listing_lifecycle() {
    let server = setup_test_server().await;
    let seller = UserId::generate();

    let created = server
        .post("/listings")
        .add_header(caller_header(), caller(seller))
        .multipart(listing_form("ACTIVE"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["listing"]["status"], "ACTIVE");
    assert_eq!(body["listing"]["price"], "25.00");
    assert_eq!(body["listing"]["currency"], "GBP");
    assert_eq!(body["listing"]["sellerId"], seller.to_string());
    assert_eq!(body["listing"]["images"].as_array().unwrap().len(), 1);
    let id = body["listing"]["id"].as_str().unwrap().to_string();

    let fetched = server.get(&format!("/listings/{}", id)).await;
    fetched.assert_status(StatusCode::OK);
    let body: Value = fetched.json();
    assert_eq!(body["listing"]["viewCount"], 1);

    let updated = server
        .patch(&format!("/listings/{}", id))
        .add_header(caller_header(), caller(seller))
        .json(&json!({ "title": "Vintage 501 jeans, W32", "brand": null }))
        .await;
    updated.assert_status(StatusCode::OK);
    let body: Value = updated.json();
    assert_eq!(body["listing"]["title"], "Vintage 501 jeans, W32");
    assert!(body["listing"]["brand"].is_null());

    let added = server
        .post(&format!("/listings/{}/images", id))
        .add_header(caller_header(), caller(seller))
        .multipart(
            MultipartForm::new()
                .add_part("images", image("back.jpg"))
                .add_part("images", image("label.jpg")),
        )
        .await;
    added.assert_status(StatusCode::OK);
    let body: Value = added.json();
    assert_eq!(body["images"].as_array().unwrap().len(), 3);

    let removed = server
        .delete(&format!("/listings/{}/images/0", id))
        .add_header(caller_header(), caller(seller))
        .await;
    removed.assert_status(StatusCode::OK);
    let body: Value = removed.json();
    assert_eq!(body["images"].as_array().unwrap().len(), 2);

    let sold = server
        .patch(&format!("/listings/{}/status", id))
        .add_header(caller_header(), caller(seller))
        .json(&json!({ "status": "SOLD" }))
        .await;
    sold.assert_status(StatusCode::OK);
    let body: Value = sold.json();
    assert_eq!(body["listing"]["status"], "SOLD");

    let deleted = server
        .delete(&format!("/listings/{}", id))
        .add_header(caller_header(), caller(seller))
        .await;
    deleted.assert_status(StatusCode::OK);
    let body: Value = deleted.json();
    assert_eq!(body["ok"], true);

    let gone = server.get(&format!("/listings/{}", id)).await;
    gone.assert_status(StatusCode::OK);
    let body: Value = gone.json();
    assert_eq!(body["listing"]["status"], "REMOVED");
    assert!(body["listing"]["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_errors_use_type_and_detail() {
    let server = setup_test_server().await;
    let seller = UserId::generate();
    let id = create_listing(&server, seller, "DRAFT").await;

    let anonymous = server
        .post("/listings")
        .multipart(listing_form("ACTIVE"))
        .await;
    anonymous.assert_status(StatusCode::UNAUTHORIZED);
    assert_error(&anonymous.json(), "auth_error");

    let stranger = server
        .delete(&format!("/listings/{}", id))
        .add_header(caller_header(), caller(UserId::generate()))
        .await;
    stranger.assert_status(StatusCode::FORBIDDEN);
    assert_error(&stranger.json(), "forbidden");

    let missing = server
        .get(&format!("/listings/{}", uuid::Uuid::new_v4()))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_error(&missing.json(), "not_found");

    let malformed = server.get("/listings/not-a-uuid").await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&malformed.json(), "validation_error");

    let bad_transition = server
        .patch(&format!("/listings/{}/status", id))
        .add_header(caller_header(), caller(seller))
        .json(&json!({ "status": "SOLD" }))
        .await;
    bad_transition.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad_transition.json();
    assert_error(&body, "validation_error");
    assert_eq!(body["detail"], "Invalid status transition: DRAFT -> SOLD");

    let last_image = server
        .delete(&format!("/listings/{}/images/0", id))
        .add_header(caller_header(), caller(seller))
        .await;
    last_image.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&last_image.json(), "validation_error");

    let bad_index = server
        .delete(&format!("/listings/{}/images/first", id))
        .add_header(caller_header(), caller(seller))
        .await;
    bad_index.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&bad_index.json(), "validation_error");
}

#[tokio::test]
async fn test_http_removal_goes_through_status_not_content_patch() {
    let server = setup_test_server().await;
    let seller = UserId::generate();
    let id = create_listing(&server, seller, "ACTIVE").await;

    let via_content = server
        .patch(&format!("/listings/{}", id))
        .add_header(caller_header(), caller(seller))
        .json(&json!({ "status": "REMOVED" }))
        .await;
    via_content.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = via_content.json();
    assert_error(&body, "validation_error");
    assert_eq!(body["detail"], "Listings are removed through the delete operation");

    let via_status = server
        .patch(&format!("/listings/{}/status", id))
        .add_header(caller_header(), caller(seller))
        .json(&json!({ "status": "REMOVED" }))
        .await;
    via_status.assert_status(StatusCode::OK);
    let body: Value = via_status.json();
    assert_eq!(body["listing"]["status"], "REMOVED");
    assert!(body["listing"]["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_create_validates_form() {
    let server = setup_test_server().await;
    let seller = UserId::generate();

    let no_images = server
        .post("/listings")
        .add_header(caller_header(), caller(seller))
        .multipart(
            MultipartForm::new()
                .add_text("title", "Vintage 501 jeans")
                .add_text("description", "Classic straight leg, light fade")
                .add_text("category", "BOTTOMS")
                .add_text("condition", "EXCELLENT")
                .add_text("price", "25"),
        )
        .await;
    no_images.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = no_images.json();
    assert_eq!(body["detail"], "At least one image is required");

    let no_title = server
        .post("/listings")
        .add_header(caller_header(), caller(seller))
        .multipart(
            MultipartForm::new()
                .add_text("description", "Classic straight leg, light fade")
                .add_text("category", "BOTTOMS")
                .add_text("condition", "EXCELLENT")
                .add_text("price", "25")
                .add_part("images", image("front.jpg")),
        )
        .await;
    no_title.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = no_title.json();
    assert_eq!(body["detail"], "title is required");

    let not_an_image = server
        .post("/listings")
        .add_header(caller_header(), caller(seller))
        .multipart(
            listing_form("ACTIVE").add_part(
                "images",
                Part::text("plain words")
                    .file_name("notes.txt")
                    .mime_type("text/plain"),
            ),
        )
        .await;
    not_an_image.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&not_an_image.json(), "validation_error");
}

#[tokio::test]
async fn test_http_browse_and_user_listings() {
    let server = setup_test_server().await;
    let seller = UserId::generate();

    create_listing(&server, seller, "ACTIVE").await;
    create_listing(&server, seller, "ACTIVE").await;
    create_listing(&server, seller, "DRAFT").await;

    let browse = server
        .get("/listings")
        .add_query_param("category", "BOTTOMS")
        .add_query_param("limit", "1")
        .await;
    browse.assert_status(StatusCode::OK);
    let body: Value = browse.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);

    let tops = server.get("/listings").add_query_param("category", "TOPS").await;
    tops.assert_status(StatusCode::OK);
    let body: Value = tops.json();
    assert_eq!(body["pagination"]["total"], 0);

    let zero_page = server.get("/listings").add_query_param("page", "0").await;
    zero_page.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&zero_page.json(), "validation_error");

    let mine = server
        .get(&format!("/listings/users/{}/listings", seller))
        .await;
    mine.assert_status(StatusCode::OK);
    let body: Value = mine.json();
    assert_eq!(body["pagination"]["total"], 3);

    let drafts = server
        .get(&format!("/listings/users/{}/listings", seller))
        .add_query_param("status", "DRAFT")
        .await;
    drafts.assert_status(StatusCode::OK);
    let body: Value = drafts.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["status"], "DRAFT");
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = setup_test_server().await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
}
