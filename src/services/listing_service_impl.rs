use async_trait::async_trait;
use futures::future::join_all;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, instrument, warn};

use super::{
    ImageSetManager, ImageUrlResolver, ListingPolicy, StatusTransitionEngine, TransitionPlan,
};
use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        models::{
            validate_description, validate_optional, validate_title, ImageUpload, Listing,
            ListingFilter, ListingImage, ListingQuery, ListingSort, ListingStatus, ListingUpdate,
            ListingView, NewListing, Pagination, SellerSummary, SortField, SortOrder,
            BRAND_MAX_LEN, SIZE_MAX_LEN, SIZE_UPDATE_MAX_LEN,
        },
        value_objects::{Currency, ListingId, Price, UserId},
    },
    ports::{
        repositories::{ListingRepository, SellerRepository, TransactionRepository},
        services::{
            BrowseListings, CreateListingInput, ListingPageView, ListingService,
            UpdateListingInput,
        },
        storage::ObjectStore,
    },
};

/// Implementation of ListingService orchestrating the repository, the image
/// set manager and the status engine
#[derive(Clone)]
pub struct ListingServiceImpl {
    repository: Arc<dyn ListingRepository>,
    transactions: Arc<dyn TransactionRepository>,
    sellers: Arc<dyn SellerRepository>,
    images: ImageSetManager,
    transitions: StatusTransitionEngine,
    urls: ImageUrlResolver,
    policy: Arc<ListingPolicy>,
}

impl ListingServiceImpl {
    pub fn new(
        repository: Arc<dyn ListingRepository>,
        transactions: Arc<dyn TransactionRepository>,
        sellers: Arc<dyn SellerRepository>,
        store: Arc<dyn ObjectStore>,
        policy: ListingPolicy,
    ) -> Self {
        let policy = Arc::new(policy);

        let mut urls = ImageUrlResolver::new(policy.public_base_url.clone());
        if let Some(ttl) = policy.signed_url_ttl {
            urls = urls.with_signer(store.clone(), ttl);
        }

        Self {
            images: ImageSetManager::new(store, repository.clone(), policy.clone()),
            transitions: StatusTransitionEngine::new(repository.clone()),
            repository,
            transactions,
            sellers,
            urls,
            policy,
        }
    }

    pub fn policy(&self) -> &ListingPolicy {
        &self.policy
    }

    async fn seller_directory(&self, ids: Vec<UserId>) -> HashMap<UserId, SellerSummary> {
        match self.sellers.get_seller_summaries(&ids).await {
            Ok(sellers) => sellers.into_iter().map(|s| (s.id, s)).collect(),
            Err(e) => {
                warn!(error = %e, "Seller lookup failed, returning listings without seller");
                HashMap::new()
            }
        }
    }

    async fn present(&self, listing: Listing) -> ListingView {
        let mut sellers = self.seller_directory(vec![listing.seller_id]).await;
        let images = self.urls.resolve_all(&listing.images).await;
        ListingView {
            seller: sellers.remove(&listing.seller_id),
            images,
            listing,
        }
    }

    async fn present_many(&self, listings: Vec<Listing>) -> Vec<ListingView> {
        let mut ids: Vec<UserId> = listings.iter().map(|l| l.seller_id).collect();
        ids.sort();
        ids.dedup();
        let sellers = self.seller_directory(ids).await;

        let images = join_all(listings.iter().map(|l| self.urls.resolve_all(&l.images))).await;
        listings
            .into_iter()
            .zip(images)
            .map(|(listing, images)| ListingView {
                seller: sellers.get(&listing.seller_id).cloned(),
                images,
                listing,
            })
            .collect()
    }

    async fn images_of(&self, listing: &Listing) -> Vec<ListingImage> {
        self.urls.resolve_all(&listing.images).await
    }

    /// Guarded soft delete: no blocking transaction, then `REMOVED` with an
    /// empty image list, then best-effort cleanup of the old objects.
    async fn soft_delete(&self, listing: Listing) -> ListingResult<Listing> {
        if let Some(transaction) = self
            .transactions
            .find_blocking_transaction(&listing.id)
            .await?
        {
            info!(
                listing_id = %listing.id,
                transaction_id = %transaction.id,
                status = %transaction.status,
                "Delete blocked by active transaction"
            );
            return Err(ListingError::BlockingTransaction {
                status: transaction.status,
            });
        }

        let update = ListingUpdate::builder()
            .status(ListingStatus::Removed)
            .images(Vec::new())
            .build();
        let removed = self
            .repository
            .update_fields(&listing.id, update, Some(listing.version))
            .await?;

        info!(listing_id = %listing.id, images = listing.images.len(), "Listing removed");
        self.images.discard(&listing.images).await;
        Ok(removed)
    }

    fn resolve_currency(&self, code: Option<&str>, fallback: &Currency) -> ListingResult<Currency> {
        match code {
            Some(code) => Ok(Currency::new(code)?),
            None => Ok(fallback.clone()),
        }
    }

    async fn page_of(&self, query: ListingQuery) -> ListingResult<ListingPageView> {
        let result = self.repository.find_many(&query).await?;
        Ok(ListingPageView {
            items: self.present_many(result.items).await,
            pagination: Pagination::new(result.total, query.page),
        })
    }
}

#[async_trait]
impl ListingService for ListingServiceImpl {
    #[instrument(skip(self, input, images), fields(images = images.len()))]
    async fn create_listing(
        &self,
        caller: UserId,
        input: CreateListingInput,
        images: Vec<ImageUpload>,
    ) -> ListingResult<ListingView> {
        let status = match input.status {
            None => ListingStatus::Draft,
            Some(status @ (ListingStatus::Draft | ListingStatus::Active)) => status,
            Some(other) => {
                return Err(ListingError::validation(format!(
                    "Listings can only be created as DRAFT or ACTIVE, not {}",
                    other
                )))
            }
        };

        let currency =
            self.resolve_currency(input.currency.as_deref(), &self.policy.default_currency)?;
        let listing = NewListing {
            seller_id: caller,
            title: validate_title(&input.title)?,
            description: validate_description(&input.description)?,
            brand: validate_optional("brand", input.brand.as_deref(), BRAND_MAX_LEN)?,
            category: input.category,
            condition: input.condition,
            size: validate_optional("size", input.size.as_deref(), SIZE_MAX_LEN)?,
            price: Price::new(input.price, currency)?,
            status,
            images: Vec::new(),
        };

        let created = self.images.create_with_images(listing, images).await?;
        Ok(self.present(created).await)
    }

    #[instrument(skip(self))]
    async fn get_listing(&self, id: ListingId, track_view: bool) -> ListingResult<ListingView> {
        let listing = self.repository.get_by_id(&id).await?;

        let listing = if track_view {
            match self.repository.increment_view_count(&id).await {
                Ok(counted) => counted,
                Err(e) => {
                    warn!(listing_id = %id, error = %e, "Failed to record listing view");
                    listing
                }
            }
        } else {
            listing
        };

        Ok(self.present(listing).await)
    }

    #[instrument(skip(self, input))]
    async fn update_listing(
        &self,
        id: ListingId,
        caller: UserId,
        input: UpdateListingInput,
    ) -> ListingResult<ListingView> {
        let listing = self.repository.get_by_id(&id).await?;
        listing.ensure_owned_by(&caller, "update")?;
        listing.ensure_content_editable()?;

        let mut update = ListingUpdate::default();
        if let Some(title) = &input.title {
            update.title = Some(validate_title(title)?);
        }
        if let Some(description) = &input.description {
            update.description = Some(validate_description(description)?);
        }
        if let Some(brand) = &input.brand {
            update.brand = Some(validate_optional("brand", brand.as_deref(), BRAND_MAX_LEN)?);
        }
        if let Some(size) = &input.size {
            update.size = Some(validate_optional(
                "size",
                size.as_deref(),
                SIZE_UPDATE_MAX_LEN,
            )?);
        }
        update.category = input.category;
        update.condition = input.condition;

        if input.price.is_some() || input.currency.is_some() {
            let amount = input.price.unwrap_or_else(|| listing.price.amount());
            let currency =
                self.resolve_currency(input.currency.as_deref(), listing.price.currency())?;
            update.price = Some(Price::new(amount, currency)?);
        }

        if let Some(target) = input.status {
            if target == ListingStatus::Removed {
                return Err(ListingError::validation(
                    "Listings are removed through the delete operation",
                ));
            }
            if let TransitionPlan::Apply(status) =
                StatusTransitionEngine::plan(listing.status, target)?
            {
                update.status = Some(status);
            }
        }

        if update.is_empty() {
            debug!(listing_id = %id, "Empty update, nothing to persist");
            return Ok(self.present(listing).await);
        }

        let updated = self
            .repository
            .update_fields(&id, update, Some(listing.version))
            .await?;
        info!(listing_id = %id, "Listing updated");
        Ok(self.present(updated).await)
    }

    #[instrument(skip(self))]
    async fn delete_listing(&self, id: ListingId, caller: UserId) -> ListingResult<()> {
        let listing = self.repository.get_by_id(&id).await?;
        listing.ensure_owned_by(&caller, "delete")?;

        if listing.status == ListingStatus::Removed {
            debug!(listing_id = %id, "Listing already removed");
            return Ok(());
        }

        self.soft_delete(listing).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn browse_listings(&self, params: BrowseListings) -> ListingResult<ListingPageView> {
        let page = self.policy.page_request(params.page, params.limit)?;

        if let (Some(min), Some(max)) = (params.filter.min_price, params.filter.max_price) {
            if min > max {
                return Err(ListingError::validation(
                    "minPrice cannot be greater than maxPrice",
                ));
            }
        }

        let mut filter = params.filter;
        if filter.status.is_none() {
            filter.status = Some(ListingStatus::Active);
        }

        self.page_of(ListingQuery {
            filter,
            sort: params.sort,
            page,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_user_listings(
        &self,
        seller: UserId,
        status: Option<ListingStatus>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ListingResult<ListingPageView> {
        let page = self.policy.page_request(page, limit)?;
        let filter = ListingFilter::builder()
            .seller_id(seller)
            .maybe_status(status)
            .build();

        self.page_of(ListingQuery {
            filter,
            sort: ListingSort {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            },
            page,
        })
        .await
    }

    #[instrument(skip(self, images), fields(images = images.len()))]
    async fn add_images(
        &self,
        id: ListingId,
        caller: UserId,
        images: Vec<ImageUpload>,
    ) -> ListingResult<Vec<ListingImage>> {
        let listing = self.images.add_images(&id, &caller, images).await?;
        Ok(self.images_of(&listing).await)
    }

    #[instrument(skip(self))]
    async fn remove_image(
        &self,
        id: ListingId,
        caller: UserId,
        index: usize,
    ) -> ListingResult<Vec<ListingImage>> {
        let listing = self.images.remove_image(&id, &caller, index).await?;
        Ok(self.images_of(&listing).await)
    }

    #[instrument(skip(self))]
    async fn change_status(
        &self,
        id: ListingId,
        caller: UserId,
        target: ListingStatus,
    ) -> ListingResult<ListingView> {
        let listing = if target == ListingStatus::Removed {
            let listing = self.repository.get_by_id(&id).await?;
            listing.ensure_owned_by(&caller, "update")?;
            match StatusTransitionEngine::plan(listing.status, target)? {
                TransitionPlan::Unchanged => listing,
                TransitionPlan::Apply(_) => self.soft_delete(listing).await?,
            }
        } else {
            self.transitions.transition(&id, &caller, target).await?
        };

        Ok(self.present(listing).await)
    }
}

/// Builder for ListingServiceImpl
#[derive(Default)]
pub struct ListingServiceBuilder {
    repository: Option<Arc<dyn ListingRepository>>,
    transactions: Option<Arc<dyn TransactionRepository>>,
    sellers: Option<Arc<dyn SellerRepository>>,
    store: Option<Arc<dyn ObjectStore>>,
    policy: ListingPolicy,
}

impl ListingServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository(mut self, repository: Arc<dyn ListingRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn transactions(mut self, transactions: Arc<dyn TransactionRepository>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn sellers(mut self, sellers: Arc<dyn SellerRepository>) -> Self {
        self.sellers = Some(sellers);
        self
    }

    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn policy(mut self, policy: ListingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<ListingServiceImpl, &'static str> {
        let repository = self.repository.ok_or("Listing repository is required")?;
        let transactions = self.transactions.ok_or("Transaction repository is required")?;
        let sellers = self.sellers.ok_or("Seller repository is required")?;
        let store = self.store.ok_or("Store is required")?;

        Ok(ListingServiceImpl::new(
            repository,
            transactions,
            sellers,
            store,
            self.policy,
        ))
    }
}
