mod identifiers;
mod image_key;
mod price;

pub use identifiers::{ListingId, UserId};
pub use image_key::{ImageKey, LISTING_IMAGE_PREFIX, MAX_EXTENSION_LEN};
pub use price::{validate_amount, Currency, Price, DEFAULT_CURRENCY, MAX_PRICE, MAX_PRICE_SCALE};
