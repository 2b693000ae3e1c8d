pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::{ListingRepository, SellerRepository, TransactionRepository};
pub use services::{
    BrowseListings, CreateListingInput, ListingPageView, ListingService, UpdateListingInput,
};
pub use storage::{ObjectStore, StoredObject};
