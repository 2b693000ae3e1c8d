mod listing_errors;
mod repository_errors;
mod storage_errors;
mod validation_errors;

pub use listing_errors::*;
pub use repository_errors::*;
pub use storage_errors::*;
pub use validation_errors::*;
