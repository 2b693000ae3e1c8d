pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Models
    Category,
    Condition,
    // Value objects
    Currency,
    ImageKey,
    ImageUpload,
    Listing,
    // Errors
    ListingError,
    ListingId,
    ListingImage,
    ListingResult,
    ListingStatus,
    ListingView,
    Price,
    RepositoryError,
    StorageError,
    TransactionStatus,
    UserId,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{
    // Repository ports
    ListingRepository,
    // Service ports
    ListingService,
    // Storage ports
    ObjectStore,
    SellerRepository,
    TransactionRepository,
};

// Service implementations - business logic
pub use services::{
    ImageSetManager, ListingPolicy, ListingServiceBuilder, ListingServiceImpl,
    StatusTransitionEngine,
};

// Application factory and configuration
pub use app::{
    create_in_memory_app, AppBuilder, AppConfig, AppDependencies, AppError, AppServices,
    RepositoryBackend, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    persistence::{
        InMemoryListingRepository, InMemorySellerRepository, InMemoryTransactionRepository,
    },
    storage::ApacheObjectStoreAdapter,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, ApacheObjectStoreAdapter, AppBuilder, AppServices, ImageUpload,
        ListingId, ListingPolicy, ListingRepository, ListingService, ListingServiceImpl,
        ListingStatus, ObjectStore, UserId,
    };
}
