mod listing_repository;
mod seller_repository;
mod transaction_repository;

pub use listing_repository::ListingRepository;
pub use seller_repository::SellerRepository;
pub use transaction_repository::TransactionRepository;
