use crate::domain::{errors::StorageError, value_objects::ImageKey};

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { ref path, .. } => match ImageKey::new(path.clone()) {
                Ok(key) => StorageError::ObjectNotFound { key },
                Err(_) => StorageError::InfrastructureError {
                    message: format!("Object not found at invalid path: {}", path),
                    source: Some(err.to_string()),
                },
            },
            object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
                StorageError::UnsupportedOperation {
                    operation: "unknown".to_string(),
                    reason: err.to_string(),
                }
            }
            _ => StorageError::InfrastructureError {
                message: format!("Object store operation failed: {}", err),
                source: Some(err.to_string()),
            },
        }
    }
}

/// Map a backend failure for `key`, keeping the operation name where the
/// generic conversion would lose it
pub(crate) fn map_store_error(
    err: object_store::Error,
    key: &ImageKey,
    operation: &str,
) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::ObjectNotFound { key: key.clone() },
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            key: key.clone(),
            operation: operation.to_string(),
        },
        object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
            StorageError::UnsupportedOperation {
                operation: operation.to_string(),
                reason: err.to_string(),
            }
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_key() {
        let key = ImageKey::new("listings/a.png".to_string()).unwrap();
        let err = object_store::Error::NotFound {
            path: key.as_str().to_string(),
            source: "missing".into(),
        };
        match map_store_error(err, &key, "delete") {
            StorageError::ObjectNotFound { key: found } => assert_eq!(found, key),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_generic_is_infrastructure() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        };
        assert!(matches!(
            StorageError::from(err),
            StorageError::InfrastructureError { .. }
        ));
    }
}
