use crate::domain::{errors::StorageResult, value_objects::ImageKey};
use async_trait::async_trait;
use bytes::Bytes;

/// Port for the blob storage that holds listing images.
/// The core only needs to store bytes under a key, delete a key and
/// optionally sign a URL for it.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store object data under `key`
    async fn put_object(
        &self,
        key: &ImageKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<StoredObject>;

    /// Delete object data. Deleting a missing key is not an error.
    async fn delete_object(&self, key: &ImageKey) -> StorageResult<()>;

    /// Get a pre-signed GET URL for a private bucket
    async fn get_presigned_url(
        &self,
        key: &ImageKey,
        expiration_seconds: u64,
    ) -> StorageResult<String>;
}

/// Receipt for a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: ImageKey,
    pub etag: Option<String>,
}
