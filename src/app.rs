use axum::Router;
use object_store::memory::InMemory;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::{
        inbound::http::{create_router, AppState},
        outbound::{
            persistence::{
                InMemoryListingRepository, InMemorySellerRepository, InMemoryTransactionRepository,
                SqlListingRepository, SqlSellerRepository, SqlTransactionRepository,
            },
            storage::{create_s3_store, ApacheObjectStoreAdapter, S3Config},
        },
    },
    ports::{
        repositories::{ListingRepository, SellerRepository, TransactionRepository},
        storage::ObjectStore,
    },
    services::{ListingPolicy, ListingServiceBuilder, ListingServiceImpl},
};

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
    pub policy: ListingPolicy,
}

/// Storage backend configuration
#[derive(Debug, Clone, Default)]
pub enum StorageBackend {
    #[default]
    InMemory,
    /// AWS S3 or any S3-compatible server such as MinIO
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        allow_http: bool,
    },
}

/// Repository backend configuration
#[derive(Debug, Clone, Default)]
pub enum RepositoryBackend {
    #[default]
    InMemory,
    Postgres {
        connection_string: String,
        max_connections: u32,
    },
}

/// Application dependencies container
#[derive(Clone)]
pub struct AppDependencies {
    pub object_store: Arc<dyn ObjectStore>,
    pub listing_repository: Arc<dyn ListingRepository>,
    pub transaction_repository: Arc<dyn TransactionRepository>,
    pub seller_repository: Arc<dyn SellerRepository>,
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub listing_service: ListingServiceImpl,
}

impl AppServices {
    /// HTTP router serving these services
    pub fn router(&self) -> Router {
        let state = AppState::new(
            Arc::new(self.listing_service.clone()),
            self.listing_service.policy(),
        );
        create_router(state)
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Configure listing limits and URL handling
    pub fn with_policy(mut self, policy: ListingPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let object_store = self.create_storage_adapter()?;
        let (listing_repository, transaction_repository, seller_repository) =
            self.create_repositories().await?;

        Ok(AppDependencies {
            object_store,
            listing_repository,
            transaction_repository,
            seller_repository,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;
        self.build_from(deps)
    }

    /// Wire services onto externally created dependencies
    pub fn build_from(self, deps: AppDependencies) -> Result<AppServices, AppError> {
        let listing_service = ListingServiceBuilder::new()
            .repository(deps.listing_repository)
            .transactions(deps.transaction_repository)
            .sellers(deps.seller_repository)
            .store(deps.object_store)
            .policy(self.config.policy)
            .build()
            .map_err(|message| AppError::ServiceInit {
                message: message.to_string(),
            })?;

        Ok(AppServices { listing_service })
    }

    /// Create storage adapter based on configuration
    fn create_storage_adapter(&self) -> Result<Arc<dyn ObjectStore>, AppError> {
        let timeout = self.config.policy.storage_timeout;

        match &self.config.storage_backend {
            StorageBackend::InMemory => {
                let adapter =
                    ApacheObjectStoreAdapter::new(Arc::new(InMemory::new())).with_timeout(timeout);
                Ok(Arc::new(adapter))
            }
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
                allow_http,
            } => {
                let store = create_s3_store(&S3Config {
                    bucket: bucket.clone(),
                    region: region.clone(),
                    endpoint: endpoint.clone(),
                    access_key: access_key.clone(),
                    secret_key: secret_key.clone(),
                    allow_http: *allow_http,
                })
                .map_err(|e| AppError::StorageInit {
                    message: format!("{:#}", e),
                })?;

                info!(bucket = %bucket, region = %region, "Using S3 object store");
                let adapter = ApacheObjectStoreAdapter::new(store.clone())
                    .with_signer(store)
                    .with_timeout(timeout);
                Ok(Arc::new(adapter))
            }
        }
    }

    /// Create repositories based on configuration
    async fn create_repositories(
        &self,
    ) -> Result<
        (
            Arc<dyn ListingRepository>,
            Arc<dyn TransactionRepository>,
            Arc<dyn SellerRepository>,
        ),
        AppError,
    > {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => Ok((
                Arc::new(InMemoryListingRepository::new()),
                Arc::new(InMemoryTransactionRepository::new()),
                Arc::new(InMemorySellerRepository::new()),
            )),
            RepositoryBackend::Postgres {
                connection_string,
                max_connections,
            } => {
                let pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to connect to database: {}", e),
                    })?;

                let listings = SqlListingRepository::new(pool.clone());
                let transactions = SqlTransactionRepository::new(pool.clone());
                let sellers = SqlSellerRepository::new(pool);

                let migrated = async {
                    listings.migrate().await?;
                    transactions.migrate().await?;
                    sellers.migrate().await
                };
                migrated.await.map_err(|e| AppError::RepositoryInit {
                    message: format!("Failed to migrate database: {}", e),
                })?;

                info!("Using PostgreSQL repositories");
                Ok((
                    Arc::new(listings),
                    Arc::new(transactions),
                    Arc::new(sellers),
                ))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },

    #[error("Service initialization error: {message}")]
    ServiceInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_app() {
        let app = create_in_memory_app().await.unwrap();
        assert_eq!(app.listing_service.policy().max_images, 8);
    }

    #[tokio::test]
    async fn test_app_builder_applies_policy() {
        let policy = ListingPolicy {
            max_images: 3,
            public_base_url: Some("https://cdn.example.com".to_string()),
            ..Default::default()
        };
        let app = AppBuilder::new().with_policy(policy).build().await.unwrap();

        assert_eq!(app.listing_service.policy().max_images, 3);
        assert_eq!(
            app.listing_service.policy().public_base_url.as_deref(),
            Some("https://cdn.example.com")
        );
    }

    #[tokio::test]
    async fn test_dependencies_creation() {
        let builder = AppBuilder::new();
        let deps = builder.build_dependencies().await.unwrap();
        let services = builder.build_from(deps).unwrap();
        let _router = services.router();
    }
}
