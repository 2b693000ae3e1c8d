use crate::domain::{
    errors::RepositoryResult,
    models::{Listing, ListingPage, ListingQuery, ListingUpdate, NewListing},
    value_objects::ListingId,
};
use async_trait::async_trait;

/// Repository owning persisted listing records.
///
/// Every write is atomic for a single listing, sets `updated_at` and bumps
/// `version` by one.
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
    /// Persist a new listing. The repository assigns id, timestamps and
    /// version 1.
    async fn create(&self, listing: NewListing) -> RepositoryResult<Listing>;

    /// Fetch a listing, `NotFound` if it never existed
    async fn get_by_id(&self, id: &ListingId) -> RepositoryResult<Listing>;

    /// Apply a partial update.
    ///
    /// With `expected_version` set the write only happens if the stored
    /// version still matches, otherwise `VersionConflict` is returned and
    /// nothing changes.
    async fn update_fields(
        &self,
        id: &ListingId,
        update: ListingUpdate,
        expected_version: Option<i64>,
    ) -> RepositoryResult<Listing>;

    /// Bump the view counter. Does not touch `version` or `updated_at`.
    async fn increment_view_count(&self, id: &ListingId) -> RepositoryResult<Listing>;

    /// Filtered, sorted, paged search returning the page plus total count
    async fn find_many(&self, query: &ListingQuery) -> RepositoryResult<ListingPage<Listing>>;
}
