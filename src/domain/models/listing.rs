use bon::Builder;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Category, Condition, ListingStatus};
use crate::domain::{
    errors::{ListingError, ListingResult, ValidationError},
    value_objects::{ImageKey, ListingId, Price, UserId},
};

pub const TITLE_LEN: (usize, usize) = (3, 100);
pub const DESCRIPTION_LEN: (usize, usize) = (10, 2000);
pub const BRAND_MAX_LEN: usize = 30;
pub const SIZE_MAX_LEN: usize = 20;
pub const SIZE_UPDATE_MAX_LEN: usize = 50;

/// A seller's for-sale item record
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub seller_id: UserId,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Category,
    pub condition: Condition,
    pub size: Option<String>,
    pub price: Price,
    pub status: ListingStatus,
    /// Ordered storage keys; the first one is the primary image
    pub images: Vec<ImageKey>,
    pub view_count: u64,
    /// Bumped by the repository on every write, used for optimistic checks
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_owned_by(&self, caller: &UserId) -> bool {
        self.seller_id == *caller
    }

    /// Fail with `Forbidden` unless `caller` is the seller
    pub fn ensure_owned_by(&self, caller: &UserId, action: &str) -> ListingResult<()> {
        if self.is_owned_by(caller) {
            Ok(())
        } else {
            Err(ListingError::forbidden(format!(
                "You can only {} your own listings",
                action
            )))
        }
    }

    /// Image sets may be changed on anything that has not been removed
    pub fn ensure_images_mutable(&self) -> ListingResult<()> {
        if self.status == ListingStatus::Removed {
            return Err(ListingError::ListingRemoved);
        }
        Ok(())
    }

    /// Content fields are frozen once sold or removed
    pub fn ensure_content_editable(&self) -> ListingResult<()> {
        match self.status {
            ListingStatus::Sold => Err(ListingError::ListingSold),
            ListingStatus::Removed => Err(ListingError::ListingRemoved),
            _ => Ok(()),
        }
    }
}

/// Fields the repository needs to persist a brand new listing
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub seller_id: UserId,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Category,
    pub condition: Condition,
    pub size: Option<String>,
    pub price: Price,
    pub status: ListingStatus,
    pub images: Vec<ImageKey>,
}

/// Partial update. `None` leaves a field untouched; for nullable columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub brand: Option<Option<String>>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub size: Option<Option<String>>,
    pub price: Option<Price>,
    pub status: Option<ListingStatus>,
    pub images: Option<Vec<ImageKey>>,
}

impl ListingUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ListingUpdate::default()
    }

    /// Apply the supplied fields onto `listing`
    pub fn apply_to(&self, listing: &mut Listing) {
        if let Some(title) = &self.title {
            listing.title = title.clone();
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(brand) = &self.brand {
            listing.brand = brand.clone();
        }
        if let Some(category) = self.category {
            listing.category = category;
        }
        if let Some(condition) = self.condition {
            listing.condition = condition;
        }
        if let Some(size) = &self.size {
            listing.size = size.clone();
        }
        if let Some(price) = &self.price {
            listing.price = price.clone();
        }
        if let Some(status) = self.status {
            listing.status = status;
        }
        if let Some(images) = &self.images {
            listing.images = images.clone();
        }
    }
}

/// Public profile data shown next to a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub id: UserId,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display form of an attached image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingImage {
    pub key: String,
    pub url: Option<String>,
}

/// A listing ready for display: resolved image URLs plus the seller summary
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub listing: Listing,
    pub images: Vec<ListingImage>,
    pub seller: Option<SellerSummary>,
}

/// One file received from a caller, buffered in memory until uploaded
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            data,
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn bounded(field: &'static str, value: &str, min: usize, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let actual = char_len(trimmed);
    if actual < min || actual > max {
        return Err(ValidationError::FieldLength {
            field,
            actual,
            min,
            max,
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_title(value: &str) -> Result<String, ValidationError> {
    bounded("title", value, TITLE_LEN.0, TITLE_LEN.1)
}

pub fn validate_description(value: &str) -> Result<String, ValidationError> {
    bounded("description", value, DESCRIPTION_LEN.0, DESCRIPTION_LEN.1)
}

/// Optional free-text field: blank input means "absent"
pub fn validate_optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => bounded(field, v, 1, max).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Currency;
    use rust_decimal::Decimal;

    fn sample_listing(seller: UserId) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId::generate(),
            seller_id: seller,
            title: "Vintage Jeans".to_string(),
            description: "Great condition vintage jeans".to_string(),
            brand: Some("Levis".to_string()),
            category: Category::Bottoms,
            condition: Condition::Excellent,
            size: None,
            price: Price::new(Decimal::new(4500, 2), Currency::default()).unwrap(),
            status: ListingStatus::Draft,
            images: vec![ImageKey::new("listings/a.png".to_string()).unwrap()],
            view_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ownership() {
        let seller = UserId::generate();
        let listing = sample_listing(seller);
        assert!(listing.ensure_owned_by(&seller, "update").is_ok());

        let err = listing
            .ensure_owned_by(&UserId::generate(), "update")
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only update your own listings");
    }

    #[test]
    fn test_partial_update_leaves_absent_fields() {
        let mut listing = sample_listing(UserId::generate());
        let update = ListingUpdate::builder()
            .title("Updated title".to_string())
            .size(None)
            .build();

        update.apply_to(&mut listing);
        assert_eq!(listing.title, "Updated title");
        assert_eq!(listing.brand.as_deref(), Some("Levis"));
        assert_eq!(listing.size, None);
        assert_eq!(listing.description, "Great condition vintage jeans");
    }

    #[test]
    fn test_sold_listing_is_frozen() {
        let mut listing = sample_listing(UserId::generate());
        listing.status = ListingStatus::Sold;
        assert!(matches!(
            listing.ensure_content_editable(),
            Err(ListingError::ListingSold)
        ));
        assert!(listing.ensure_images_mutable().is_ok());
    }

    #[test]
    fn test_field_validation() {
        assert_eq!(validate_title("  Jeans ").unwrap(), "Jeans");
        assert!(validate_title("ab").is_err());
        assert!(validate_description("short").is_err());
        assert_eq!(validate_optional("brand", Some("   "), 30).unwrap(), None);
        assert!(validate_optional("brand", Some(&"x".repeat(31)), 30).is_err());
    }
}
