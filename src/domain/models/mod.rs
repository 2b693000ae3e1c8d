pub mod catalogue;
pub mod filter;
pub mod listing;
pub mod status;
pub mod transaction;

pub use catalogue::{Category, Condition};
pub use filter::*;
pub use listing::*;
pub use status::ListingStatus;
pub use transaction::{TransactionStatus, TransactionSummary};
