pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

pub use dto::*;
pub use error::{api_error, ApiError};
pub use extract::{Caller, CALLER_HEADER};
pub use handlers::*;
pub use router::*;
