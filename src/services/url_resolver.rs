use futures::future::join_all;
use std::{sync::Arc, time::Duration};
use tracing::warn;

use crate::{
    domain::{models::ListingImage, value_objects::ImageKey},
    ports::storage::ObjectStore,
};

/// Turns stored image keys into display URLs.
///
/// A public base wins; without one a presigned URL is produced when a TTL is
/// configured, otherwise the URL is `None`.
#[derive(Clone)]
pub struct ImageUrlResolver {
    public_base_url: Option<String>,
    signer: Option<(Arc<dyn ObjectStore>, Duration)>,
}

impl ImageUrlResolver {
    pub fn new(public_base_url: Option<String>) -> Self {
        let public_base_url = public_base_url
            .map(|base| base.trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty());
        Self {
            public_base_url,
            signer: None,
        }
    }

    pub fn with_signer(mut self, store: Arc<dyn ObjectStore>, ttl: Duration) -> Self {
        self.signer = Some((store, ttl));
        self
    }

    /// `<base>/<key>`, or `None` without a base
    pub fn public_url(&self, key: &ImageKey) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, key.as_str()))
    }

    pub async fn resolve(&self, key: &ImageKey) -> Option<String> {
        if let Some(url) = self.public_url(key) {
            return Some(url);
        }

        let (store, ttl) = self.signer.as_ref()?;
        match store.get_presigned_url(key, ttl.as_secs()).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to sign image URL");
                None
            }
        }
    }

    /// Resolve an ordered key list, keeping the order
    pub async fn resolve_all(&self, keys: &[ImageKey]) -> Vec<ListingImage> {
        let urls = join_all(keys.iter().map(|key| self.resolve(key))).await;
        keys.iter()
            .zip(urls)
            .map(|(key, url)| ListingImage {
                key: key.as_str().to_string(),
                url,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ImageKey {
        ImageKey::new("listings/2024-05-01/abc.png".to_string()).unwrap()
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        let resolver = ImageUrlResolver::new(Some("https://cdn.example.com/".to_string()));
        assert_eq!(
            resolver.public_url(&key()).as_deref(),
            Some("https://cdn.example.com/listings/2024-05-01/abc.png")
        );
    }

    #[tokio::test]
    async fn test_no_base_no_signer_yields_none() {
        let resolver = ImageUrlResolver::new(None);
        let images = resolver.resolve_all(&[key()]).await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].key, "listings/2024-05-01/abc.png");
        assert_eq!(images[0].url, None);
    }

    #[test]
    fn test_blank_base_is_ignored() {
        let resolver = ImageUrlResolver::new(Some("/".to_string()));
        assert_eq!(resolver.public_url(&key()), None);
    }
}
