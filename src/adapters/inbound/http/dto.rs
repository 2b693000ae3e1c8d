use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::HashMap, str::FromStr};

use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        models::{
            Category, Condition, ListingFilter, ListingImage, ListingSort, ListingStatus,
            ListingView, Pagination, SellerSummary,
        },
        value_objects::{ListingId, UserId},
    },
    ports::services::{BrowseListings, CreateListingInput, ListingPageView, UpdateListingInput},
};

/// DTO for a listing as shown to callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    pub id: ListingId,
    pub seller_id: UserId,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Category,
    pub condition: Condition,
    pub size: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub status: ListingStatus,
    pub images: Vec<ListingImage>,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub seller: Option<SellerSummary>,
}

impl From<ListingView> for ListingDto {
    fn from(view: ListingView) -> Self {
        let listing = view.listing;
        Self {
            id: listing.id,
            seller_id: listing.seller_id,
            price: listing.price.amount(),
            currency: listing.price.currency().as_str().to_string(),
            title: listing.title,
            description: listing.description,
            brand: listing.brand,
            category: listing.category,
            condition: listing.condition,
            size: listing.size,
            status: listing.status,
            images: view.images,
            view_count: listing.view_count,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
            seller: view.seller,
        }
    }
}

/// DTO for single-listing responses
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponseDto {
    pub ok: bool,
    pub listing: ListingDto,
}

impl ListingResponseDto {
    pub fn new(view: ListingView) -> Self {
        Self {
            ok: true,
            listing: view.into(),
        }
    }
}

/// DTO for image-set responses
#[derive(Debug, Clone, Serialize)]
pub struct ImagesResponseDto {
    pub ok: bool,
    pub images: Vec<ListingImage>,
}

impl ImagesResponseDto {
    pub fn new(images: Vec<ListingImage>) -> Self {
        Self { ok: true, images }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl From<Pagination> for PaginationDto {
    fn from(p: Pagination) -> Self {
        Self {
            total: p.total,
            page: p.page,
            limit: p.limit,
            total_pages: p.total_pages,
        }
    }
}

/// DTO for paged listing responses
#[derive(Debug, Clone, Serialize)]
pub struct ListingPageResponseDto {
    pub ok: bool,
    pub items: Vec<ListingDto>,
    pub pagination: PaginationDto,
}

impl From<ListingPageView> for ListingPageResponseDto {
    fn from(page: ListingPageView) -> Self {
        Self {
            ok: true,
            items: page.items.into_iter().map(ListingDto::from).collect(),
            pagination: page.pagination.into(),
        }
    }
}

/// DTO for responses with nothing to return
#[derive(Debug, Clone, Serialize)]
pub struct OkResponseDto {
    pub ok: bool,
}

impl OkResponseDto {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponseDto {
    fn default() -> Self {
        Self::new()
    }
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: String,
}

impl ErrorResponseDto {
    pub fn new(kind: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            detail: detail.into(),
        }
    }
}

/// Distinguishes an explicit `null` (clear the field) from an absent key
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Prices arrive either as JSON numbers or as decimal strings
fn parse_price(value: &serde_json::Value) -> ListingResult<Decimal> {
    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        _ => return Err(ListingError::validation("price must be a number")),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ListingError::validation(format!("Invalid price: {}", text)))
}

fn parse_decimal(field: &str, value: &str) -> ListingResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|_| ListingError::validation(format!("{} must be a number", field)))
}

fn parse_positive(field: &str, value: Option<&str>) -> ListingResult<Option<u32>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => match v.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ListingError::validation(format!(
                "{} must be a positive integer",
                field
            ))),
        },
    }
}

fn parse_opt<T>(value: Option<&str>) -> ListingResult<Option<T>>
where
    T: FromStr,
    ListingError: From<T::Err>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Ok(Some(v.parse()?)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Text fields of the multipart create form
#[derive(Debug, Clone, Default)]
pub struct CreateListingForm {
    pub fields: HashMap<String, String>,
}

impl CreateListingForm {
    fn required(&self, name: &str) -> ListingResult<&str> {
        self.fields
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ListingError::validation(format!("{} is required", name)))
    }

    fn optional(&self, name: &str) -> Option<String> {
        non_blank(self.fields.get(name).cloned())
    }
}

impl TryFrom<CreateListingForm> for CreateListingInput {
    type Error = ListingError;

    fn try_from(form: CreateListingForm) -> Result<Self, Self::Error> {
        Ok(CreateListingInput {
            title: form.required("title")?.to_string(),
            description: form.required("description")?.to_string(),
            category: form.required("category")?.parse()?,
            condition: form.required("condition")?.parse()?,
            price: parse_price(&serde_json::Value::String(
                form.required("price")?.to_string(),
            ))?,
            brand: form.optional("brand"),
            size: form.optional("size"),
            currency: form.optional("currency"),
            status: parse_opt(form.optional("status").as_deref())?,
        })
    }
}

/// DTO for partial listing updates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingDto {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub brand: Option<Option<String>>,
    pub category: Option<String>,
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub size: Option<Option<String>>,
    pub price: Option<serde_json::Value>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<UpdateListingDto> for UpdateListingInput {
    type Error = ListingError;

    fn try_from(dto: UpdateListingDto) -> Result<Self, Self::Error> {
        Ok(UpdateListingInput {
            title: dto.title,
            description: dto.description,
            brand: dto.brand.map(non_blank),
            category: dto.category.as_deref().map(str::parse).transpose()?,
            condition: dto.condition.as_deref().map(str::parse).transpose()?,
            size: dto.size.map(non_blank),
            price: dto.price.as_ref().map(parse_price).transpose()?,
            currency: dto.currency,
            status: dto.status.as_deref().map(str::parse).transpose()?,
        })
    }
}

/// DTO for status changes
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeDto {
    pub status: String,
}

/// Query string of the public search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQueryDto {
    pub category: Option<String>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<BrowseQueryDto> for BrowseListings {
    type Error = ListingError;

    fn try_from(dto: BrowseQueryDto) -> Result<Self, Self::Error> {
        let filter = ListingFilter {
            seller_id: None,
            status: parse_opt(dto.status.as_deref())?,
            category: parse_opt(dto.category.as_deref())?,
            condition: parse_opt(dto.condition.as_deref())?,
            size: non_blank(dto.size),
            brand: non_blank(dto.brand),
            search: non_blank(dto.search),
            min_price: non_blank(dto.min_price)
                .map(|v| parse_decimal("minPrice", &v))
                .transpose()?,
            max_price: non_blank(dto.max_price)
                .map(|v| parse_decimal("maxPrice", &v))
                .transpose()?,
        };

        let sort = ListingSort {
            field: parse_opt(dto.sort_by.as_deref())?.unwrap_or_default(),
            order: parse_opt(dto.sort_order.as_deref())?.unwrap_or_default(),
        };

        Ok(BrowseListings {
            filter,
            sort,
            page: parse_positive("page", dto.page.as_deref())?,
            limit: parse_positive("limit", dto.limit.as_deref())?,
        })
    }
}

/// Query string of the per-seller listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListingsQueryDto {
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl UserListingsQueryDto {
    pub fn parse(&self) -> ListingResult<(Option<ListingStatus>, Option<u32>, Option<u32>)> {
        Ok((
            parse_opt(self.status.as_deref())?,
            parse_positive("page", self.page.as_deref())?,
            parse_positive("limit", self.limit.as_deref())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{SortField, SortOrder};

    #[test]
    fn test_update_dto_distinguishes_null_from_absent() {
        let dto: UpdateListingDto =
            serde_json::from_str(r#"{"title":"New title","brand":null}"#).unwrap();
        let input = UpdateListingInput::try_from(dto).unwrap();

        assert_eq!(input.title.as_deref(), Some("New title"));
        assert_eq!(input.brand, Some(None));
        assert_eq!(input.size, None);
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_price_accepts_numbers_and_strings() {
        assert_eq!(
            parse_price(&serde_json::json!(45.5)).unwrap(),
            Decimal::from_str("45.5").unwrap()
        );
        assert_eq!(
            parse_price(&serde_json::json!("19.99")).unwrap(),
            Decimal::from_str("19.99").unwrap()
        );
        assert!(parse_price(&serde_json::json!(true)).is_err());
    }

    #[test]
    fn test_browse_query_parsing() {
        let dto = BrowseQueryDto {
            category: Some("bottoms".to_string()),
            min_price: Some("10".to_string()),
            sort_by: Some("price".to_string()),
            sort_order: Some("asc".to_string()),
            page: Some("2".to_string()),
            ..Default::default()
        };
        let params = BrowseListings::try_from(dto).unwrap();

        assert_eq!(params.filter.category, Some(Category::Bottoms));
        assert_eq!(params.filter.min_price, Some(Decimal::from(10)));
        assert_eq!(params.sort.field, SortField::Price);
        assert_eq!(params.sort.order, SortOrder::Asc);
        assert_eq!(params.page, Some(2));
        assert_eq!(params.filter.status, None);
    }

    #[test]
    fn test_browse_query_rejects_bad_input() {
        let bad_sort = BrowseQueryDto {
            sort_by: Some("seller_id".to_string()),
            ..Default::default()
        };
        assert!(BrowseListings::try_from(bad_sort).is_err());

        let bad_page = BrowseQueryDto {
            page: Some("0".to_string()),
            ..Default::default()
        };
        assert!(BrowseListings::try_from(bad_page).is_err());
    }

    #[test]
    fn test_create_form_requires_fields() {
        let mut form = CreateListingForm::default();
        form.fields.insert("title".to_string(), "Vintage Jeans".to_string());
        let err = CreateListingInput::try_from(form).unwrap_err();
        assert_eq!(err.to_string(), "description is required");
    }
}
