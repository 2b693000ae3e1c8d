use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ListingPolicy;
use crate::{
    domain::{
        errors::{ListingError, ListingResult, RepositoryError},
        models::{ImageUpload, Listing, ListingUpdate, NewListing},
        value_objects::{ImageKey, ListingId, UserId},
    },
    ports::{repositories::ListingRepository, storage::ObjectStore},
};

/// Keeps the bytes in the object store and the key list on the listing
/// record in step.
///
/// Uploads happen before the record is written and are deleted again if the
/// write fails. Removals write the record first and delete the object
/// afterwards, best-effort. A listing never references a key whose upload
/// did not complete.
#[derive(Clone)]
pub struct ImageSetManager {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn ListingRepository>,
    policy: Arc<ListingPolicy>,
}

impl ImageSetManager {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repository: Arc<dyn ListingRepository>,
        policy: Arc<ListingPolicy>,
    ) -> Self {
        Self {
            store,
            repository,
            policy,
        }
    }

    /// Reject non-images, empty files and oversized files before anything
    /// is uploaded
    pub fn validate_uploads(&self, uploads: &[ImageUpload]) -> ListingResult<()> {
        for upload in uploads {
            let name = upload.file_name.as_deref().unwrap_or("upload");

            let is_image = upload
                .content_type
                .as_deref()
                .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
                .unwrap_or(false);
            if !is_image {
                return Err(ListingError::validation(format!(
                    "Only image files are allowed ({})",
                    name
                )));
            }

            if upload.data.is_empty() {
                return Err(ListingError::validation(format!("{} is empty", name)));
            }

            if upload.data.len() > self.policy.max_upload_bytes {
                return Err(ListingError::validation(format!(
                    "{} exceeds the maximum file size of {} bytes",
                    name, self.policy.max_upload_bytes
                )));
            }
        }
        Ok(())
    }

    fn ensure_capacity(&self, current: usize, requested: usize) -> ListingResult<()> {
        if current + requested > self.policy.max_images {
            return Err(ListingError::CapacityExceeded {
                current,
                requested,
                max: self.policy.max_images,
            });
        }
        Ok(())
    }

    /// Upload every file in arrival order under a fresh key.
    ///
    /// If one upload fails, the keys already stored by this call are
    /// discarded before the error is returned, along with the failed key
    /// since a timed-out put may still have landed.
    pub async fn upload_all(&self, uploads: &[ImageUpload]) -> ListingResult<Vec<ImageKey>> {
        let now = Utc::now();
        let mut uploaded = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let key = ImageKey::generate(upload.file_name.as_deref(), now);
            match self
                .store
                .put_object(&key, upload.data.clone(), upload.content_type.as_deref())
                .await
            {
                Ok(stored) => {
                    debug!(key = %stored.key, etag = ?stored.etag, "Image uploaded");
                    uploaded.push(stored.key);
                }
                Err(e) => {
                    warn!(
                        key = %key,
                        error = %e,
                        uploaded = uploaded.len(),
                        "Image upload failed, discarding this request's uploads"
                    );
                    uploaded.push(key);
                    self.discard(&uploaded).await;
                    return Err(e.into());
                }
            }
        }

        Ok(uploaded)
    }

    /// Best-effort delete of `keys`. Failures and timeouts are logged and
    /// swallowed; deleting an already missing key is harmless.
    pub async fn discard(&self, keys: &[ImageKey]) {
        if keys.is_empty() {
            return;
        }

        let window = self.policy.storage_timeout;
        let outcomes = join_all(keys.iter().map(|key| async move {
            (key, tokio::time::timeout(window, self.store.delete_object(key)).await)
        }))
        .await;

        for (key, outcome) in outcomes {
            match outcome {
                Ok(Ok(())) => debug!(key = %key, "Image object deleted"),
                Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to delete image object"),
                Err(_) => warn!(
                    key = %key,
                    timeout_ms = window.as_millis() as u64,
                    "Timed out deleting image object"
                ),
            }
        }
    }

    /// Upload the initial image set and create the record that references
    /// it. No listing is left behind if either step fails.
    pub async fn create_with_images(
        &self,
        mut listing: NewListing,
        uploads: Vec<ImageUpload>,
    ) -> ListingResult<Listing> {
        if uploads.is_empty() {
            return Err(ListingError::validation("At least one image is required"));
        }
        self.ensure_capacity(0, uploads.len())?;
        self.validate_uploads(&uploads)?;

        let keys = self.upload_all(&uploads).await?;
        drop(uploads);

        listing.images = keys.clone();
        match self.repository.create(listing).await {
            Ok(created) => {
                info!(listing_id = %created.id, images = keys.len(), "Listing created");
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "Listing create failed after upload, discarding images");
                self.discard(&keys).await;
                Err(e.into())
            }
        }
    }

    /// Append `uploads` to the listing's images in arrival order.
    ///
    /// The append is conditioned on the version it was computed from. After
    /// losing a race the listing is re-read and the append retried, so this
    /// call only ever adds the keys it uploaded itself. Once retries run out,
    /// or the fresh listing has no room left, the uploads are discarded.
    pub async fn add_images(
        &self,
        listing_id: &ListingId,
        caller: &UserId,
        uploads: Vec<ImageUpload>,
    ) -> ListingResult<Listing> {
        if uploads.is_empty() {
            return Err(ListingError::validation("No images provided"));
        }

        let mut listing = self.load_for_append(listing_id, caller, uploads.len()).await?;
        self.validate_uploads(&uploads)?;

        let new_keys = self.upload_all(&uploads).await?;
        drop(uploads);

        let mut attempt = 0;
        loop {
            let mut images = listing.images.clone();
            images.extend(new_keys.iter().cloned());
            let update = ListingUpdate::builder().images(images).build();

            match self
                .repository
                .update_fields(listing_id, update, Some(listing.version))
                .await
            {
                Ok(updated) => {
                    info!(
                        listing_id = %listing_id,
                        added = new_keys.len(),
                        total = updated.images.len(),
                        "Images added"
                    );
                    return Ok(updated);
                }
                Err(RepositoryError::VersionConflict { .. })
                    if attempt < self.policy.max_append_retries =>
                {
                    attempt += 1;
                    debug!(listing_id = %listing_id, attempt, "Image append raced, retrying");
                    listing = match self
                        .load_for_append(listing_id, caller, new_keys.len())
                        .await
                    {
                        Ok(fresh) => fresh,
                        Err(e) => {
                            self.discard(&new_keys).await;
                            return Err(e);
                        }
                    };
                }
                Err(e) => {
                    warn!(
                        listing_id = %listing_id,
                        error = %e,
                        "Persisting new images failed, discarding uploads"
                    );
                    self.discard(&new_keys).await;
                    return Err(e.into());
                }
            }
        }
    }

    async fn load_for_append(
        &self,
        listing_id: &ListingId,
        caller: &UserId,
        requested: usize,
    ) -> ListingResult<Listing> {
        let listing = self.repository.get_by_id(listing_id).await?;
        listing.ensure_owned_by(caller, "update")?;
        listing.ensure_images_mutable()?;
        self.ensure_capacity(listing.images.len(), requested)?;
        Ok(listing)
    }

    /// Detach the image at `index`, then delete its object best-effort.
    ///
    /// The write only succeeds if the list is still the one the index was
    /// checked against.
    pub async fn remove_image(
        &self,
        listing_id: &ListingId,
        caller: &UserId,
        index: usize,
    ) -> ListingResult<Listing> {
        let listing = self.repository.get_by_id(listing_id).await?;
        listing.ensure_owned_by(caller, "update")?;
        listing.ensure_images_mutable()?;

        if index >= listing.images.len() {
            return Err(ListingError::InvalidIndex {
                index: index.to_string(),
                len: listing.images.len(),
            });
        }
        if listing.images.len() == 1 {
            return Err(ListingError::LastImage);
        }

        let mut images = listing.images.clone();
        let removed = images.remove(index);
        let update = ListingUpdate::builder().images(images).build();
        let updated = self
            .repository
            .update_fields(listing_id, update, Some(listing.version))
            .await?;

        info!(listing_id = %listing_id, key = %removed, index, "Image detached");
        self.discard(std::slice::from_ref(&removed)).await;

        Ok(updated)
    }
}
