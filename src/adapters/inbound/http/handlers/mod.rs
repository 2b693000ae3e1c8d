pub mod image_handlers;
pub mod listing_handlers;
pub mod multipart;

pub use image_handlers::*;
pub use listing_handlers::*;
