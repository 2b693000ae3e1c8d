use std::time::Duration;

use crate::domain::{
    errors::{ListingError, ListingResult},
    models::PageRequest,
    value_objects::Currency,
};

pub const DEFAULT_MAX_IMAGES: usize = 8;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_APPEND_RETRIES: u32 = 3;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Tunables shared by the listing services
#[derive(Debug, Clone)]
pub struct ListingPolicy {
    /// Per-listing image cap
    pub max_images: usize,
    /// Per-file upload cap in bytes
    pub max_upload_bytes: usize,
    /// Window for a single object store call
    pub storage_timeout: Duration,
    /// Public base URL of the bucket; image URLs are `<base>/<key>`
    pub public_base_url: Option<String>,
    /// Lifetime of presigned URLs, used only without a public base
    pub signed_url_ttl: Option<Duration>,
    /// How often an image append is retried after losing a version race
    pub max_append_retries: u32,
    pub default_currency: Currency,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            max_images: DEFAULT_MAX_IMAGES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
            public_base_url: None,
            signed_url_ttl: None,
            max_append_retries: DEFAULT_MAX_APPEND_RETRIES,
            default_currency: Currency::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ListingPolicy {
    /// Largest multipart body the HTTP layer should accept
    pub fn request_body_limit(&self) -> usize {
        self.max_images
            .saturating_mul(self.max_upload_bytes)
            .saturating_add(1024 * 1024)
    }

    /// Resolve 1-indexed paging parameters. Zero is rejected, oversized
    /// limits are capped.
    pub fn page_request(&self, page: Option<u32>, limit: Option<u32>) -> ListingResult<PageRequest> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ListingError::validation("page must be a positive integer"));
        }
        let limit = limit.unwrap_or(self.default_page_size);
        if limit == 0 {
            return Err(ListingError::validation("limit must be a positive integer"));
        }
        Ok(PageRequest {
            page,
            limit: limit.min(self.max_page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_caps() {
        let policy = ListingPolicy::default();
        assert_eq!(
            policy.page_request(None, None).unwrap(),
            PageRequest { page: 1, limit: 20 }
        );
        assert_eq!(policy.page_request(Some(2), Some(500)).unwrap().limit, 100);
        assert!(policy.page_request(Some(0), None).is_err());
        assert!(policy.page_request(None, Some(0)).is_err());
    }

    #[test]
    fn test_body_limit_covers_full_image_set() {
        let policy = ListingPolicy::default();
        assert!(policy.request_body_limit() > policy.max_images * policy.max_upload_bytes);
    }
}
