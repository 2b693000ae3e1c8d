use bon::Builder;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Category, Condition, Listing, ListingStatus};
use crate::domain::{errors::ValidationError, value_objects::UserId};

/// Criteria for selecting listings. Every field is optional; absent fields
/// do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct ListingFilter {
    pub seller_id: Option<UserId>,
    pub status: Option<ListingStatus>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub size: Option<String>,
    /// Case-insensitive substring of the brand
    pub brand: Option<String>,
    /// Case-insensitive substring of title, description or brand
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ListingFilter {
    /// In-process evaluation of the filter, mirroring the SQL predicate
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.seller_id.is_some_and(|s| s != listing.seller_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != listing.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != listing.category) {
            return false;
        }
        if self.condition.is_some_and(|c| c != listing.condition) {
            return false;
        }
        if let Some(size) = &self.size {
            if listing.size.as_deref() != Some(size.as_str()) {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if !contains_ci(listing.brand.as_deref().unwrap_or_default(), brand) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if listing.price.amount() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price.amount() > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let hit = contains_ci(&listing.title, search)
                || contains_ci(&listing.description, search)
                || contains_ci(listing.brand.as_deref().unwrap_or_default(), search);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sortable columns. Anything else is rejected before reaching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Title,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price_amount",
            SortField::Title => "title",
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "price" => Ok(SortField::Price),
            "title" => Ok(SortField::Title),
            other => Err(ValidationError::InvalidField {
                field: "sortBy".to_string(),
                value: other.to_string(),
                expected: "createdAt, price or title".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ValidationError::InvalidField {
                field: "sortOrder".to_string(),
                value: other.to_string(),
                expected: "asc or desc".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingSort {
    pub field: SortField,
    pub order: SortOrder,
}

/// 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Full repository query
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: ListingSort,
    pub page: PageRequest,
}

/// One page of results plus the unpaged total
#[derive(Debug, Clone)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Pagination block returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: PageRequest) -> Self {
        let limit = u64::from(page.limit.max(1));
        Self {
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_allowlist() {
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert!("seller_id; DROP TABLE listings".parse::<SortField>().is_err());
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_pagination_math() {
        let page = PageRequest { page: 3, limit: 20 };
        assert_eq!(page.offset(), 40);
        assert_eq!(Pagination::new(41, page).total_pages, 3);
        assert_eq!(Pagination::new(0, page).total_pages, 0);
        assert_eq!(Pagination::new(40, page).total_pages, 2);
    }
}
