use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{
            Listing, ListingPage, ListingQuery, ListingSort, ListingUpdate, NewListing, SortField,
            SortOrder,
        },
        value_objects::ListingId,
    },
    ports::repositories::ListingRepository,
};

/// In-memory implementation of ListingRepository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryListingRepository {
    listings: Arc<RwLock<HashMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored listings, removed ones included
    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }
}

fn compare(a: &Listing, b: &Listing, sort: ListingSort) -> std::cmp::Ordering {
    let ordering = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Price => a.price.amount().cmp(&b.price.amount()),
        SortField::Title => a.title.cmp(&b.title),
    }
    .then_with(|| a.id.cmp(&b.id));

    match sort.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: NewListing) -> RepositoryResult<Listing> {
        let now = Utc::now();
        let created = Listing {
            id: ListingId::generate(),
            seller_id: listing.seller_id,
            title: listing.title,
            description: listing.description,
            brand: listing.brand,
            category: listing.category,
            condition: listing.condition,
            size: listing.size,
            price: listing.price,
            status: listing.status,
            images: listing.images,
            view_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.listings
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: &ListingId) -> RepositoryResult<Listing> {
        self.listings
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id: *id })
    }

    async fn update_fields(
        &self,
        id: &ListingId,
        update: ListingUpdate,
        expected_version: Option<i64>,
    ) -> RepositoryResult<Listing> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .get_mut(id)
            .ok_or(RepositoryError::NotFound { id: *id })?;

        if let Some(expected) = expected_version {
            if listing.version != expected {
                return Err(RepositoryError::VersionConflict {
                    id: *id,
                    expected,
                    actual: listing.version,
                });
            }
        }

        update.apply_to(listing);
        listing.version += 1;
        listing.updated_at = Utc::now();
        Ok(listing.clone())
    }

    async fn increment_view_count(&self, id: &ListingId) -> RepositoryResult<Listing> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .get_mut(id)
            .ok_or(RepositoryError::NotFound { id: *id })?;

        listing.view_count += 1;
        Ok(listing.clone())
    }

    async fn find_many(&self, query: &ListingQuery) -> RepositoryResult<ListingPage<Listing>> {
        let listings = self.listings.read().await;

        let mut matching: Vec<&Listing> = listings
            .values()
            .filter(|listing| query.filter.matches(listing))
            .collect();
        matching.sort_by(|a, b| compare(a, b, query.sort));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .cloned()
            .collect();

        Ok(ListingPage { items, total })
    }
}
