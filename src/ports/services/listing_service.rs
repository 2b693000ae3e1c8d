use crate::domain::{
    errors::ListingResult,
    models::{
        Category, Condition, ImageUpload, ListingFilter, ListingImage, ListingSort, ListingStatus,
        ListingView, Pagination,
    },
    value_objects::{ListingId, UserId},
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Port for the listing lifecycle.
/// Every mutating call takes the caller's identity and enforces ownership.
#[async_trait]
pub trait ListingService: Send + Sync + 'static {
    /// Create a listing together with its initial image set (at least one)
    async fn create_listing(
        &self,
        caller: UserId,
        input: CreateListingInput,
        images: Vec<ImageUpload>,
    ) -> ListingResult<ListingView>;

    /// Fetch one listing. With `track_view` the view counter is bumped
    /// best-effort.
    async fn get_listing(&self, id: ListingId, track_view: bool) -> ListingResult<ListingView>;

    /// Partial content update
    async fn update_listing(
        &self,
        id: ListingId,
        caller: UserId,
        input: UpdateListingInput,
    ) -> ListingResult<ListingView>;

    /// Soft delete guarded by the external transaction check
    async fn delete_listing(&self, id: ListingId, caller: UserId) -> ListingResult<()>;

    /// Public search
    async fn browse_listings(&self, params: BrowseListings) -> ListingResult<ListingPageView>;

    /// All listings of one seller, newest first
    async fn list_user_listings(
        &self,
        seller: UserId,
        status: Option<ListingStatus>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ListingResult<ListingPageView>;

    /// Append images in arrival order
    async fn add_images(
        &self,
        id: ListingId,
        caller: UserId,
        images: Vec<ImageUpload>,
    ) -> ListingResult<Vec<ListingImage>>;

    /// Remove the image at `index`, keeping the order of the rest
    async fn remove_image(
        &self,
        id: ListingId,
        caller: UserId,
        index: usize,
    ) -> ListingResult<Vec<ListingImage>>;

    /// Move the listing along the status table
    async fn change_status(
        &self,
        id: ListingId,
        caller: UserId,
        target: ListingStatus,
    ) -> ListingResult<ListingView>;
}

/// Typed create request. Lengths and price are validated by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateListingInput {
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Category,
    pub condition: Condition,
    pub size: Option<String>,
    pub price: Decimal,
    pub currency: Option<String>,
    pub status: Option<ListingStatus>,
}

/// Typed partial update. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateListingInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub brand: Option<Option<String>>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub size: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<ListingStatus>,
}

/// Search parameters. A filter without a status searches `ACTIVE` listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseListings {
    pub filter: ListingFilter,
    pub sort: ListingSort,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A page of display-ready listings
#[derive(Debug, Clone)]
pub struct ListingPageView {
    pub items: Vec<ListingView>,
    pub pagination: Pagination,
}
