pub mod error;
pub mod in_memory_directory;
pub mod in_memory_listing_repository;
pub mod sql_directory;
pub mod sql_listing_repository;

pub use in_memory_directory::{InMemorySellerRepository, InMemoryTransactionRepository};
pub use in_memory_listing_repository::InMemoryListingRepository;
pub use sql_directory::{SqlSellerRepository, SqlTransactionRepository};
pub use sql_listing_repository::SqlListingRepository;
