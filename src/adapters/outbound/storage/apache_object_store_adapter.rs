use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    path::Path as ObjectPath, signer::Signer, Attribute, Attributes, ObjectStore as ApacheObjectStore,
    PutOptions, PutPayload,
};
use std::{future::Future, sync::Arc, time::Duration};

use super::error::map_store_error;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::ImageKey,
    },
    ports::storage::{ObjectStore, StoredObject},
};

/// Adapter that implements our ObjectStore trait using Apache object_store
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    timeout: Option<Duration>,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self {
            inner: store,
            signer: None,
            timeout: None,
        }
    }

    /// Enable presigned URLs (private buckets)
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Bound every backend call to `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn bounded<T, F>(&self, key: &ImageKey, operation: &str, call: F) -> StorageResult<T>
    where
        F: Future<Output = object_store::Result<T>>,
    {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                StorageError::Timeout {
                    key: key.clone(),
                    operation: operation.to_string(),
                    timeout_ms: limit.as_millis() as u64,
                }
            })?,
            None => call.await,
        };

        result.map_err(|e| map_store_error(e, key, operation))
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn put_object(
        &self,
        key: &ImageKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<StoredObject> {
        let path = ObjectPath::from(key.as_str());
        let payload = PutPayload::from(data);

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result = self
            .bounded(key, "put", self.inner.put_opts(&path, payload, options))
            .await?;

        Ok(StoredObject {
            key: key.clone(),
            etag: result.e_tag,
        })
    }

    async fn delete_object(&self, key: &ImageKey) -> StorageResult<()> {
        let path = ObjectPath::from(key.as_str());

        match self.bounded(key, "delete", self.inner.delete(&path)).await {
            Ok(()) | Err(StorageError::ObjectNotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn get_presigned_url(
        &self,
        key: &ImageKey,
        expiration_seconds: u64,
    ) -> StorageResult<String> {
        let Some(signer) = &self.signer else {
            return Err(StorageError::UnsupportedOperation {
                operation: "presigned_url".to_string(),
                reason: "No URL signer configured for this store".to_string(),
            });
        };

        let path = ObjectPath::from(key.as_str());
        let url = self
            .bounded(
                key,
                "sign",
                signer.signed_url(
                    http::Method::GET,
                    &path,
                    Duration::from_secs(expiration_seconds),
                ),
            )
            .await?;

        Ok(url.to_string())
    }
}
