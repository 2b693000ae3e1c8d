use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{
            Listing, ListingFilter, ListingPage, ListingQuery, ListingUpdate, NewListing,
        },
        value_objects::{Currency, ImageKey, ListingId, Price, UserId},
    },
    ports::repositories::ListingRepository,
};

const LISTING_COLUMNS: &str = "id, seller_id, title, description, brand, category, condition, \
     size, price_amount, price_currency, status, images, view_count, version, created_at, \
     updated_at";

/// SQL-based implementation of ListingRepository using PostgreSQL
#[derive(Clone)]
pub struct SqlListingRepository {
    pool: PgPool,
}

impl SqlListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id UUID PRIMARY KEY,
                seller_id UUID NOT NULL,
                title VARCHAR(100) NOT NULL,
                description TEXT NOT NULL,
                brand VARCHAR(30),
                category VARCHAR(32) NOT NULL,
                condition VARCHAR(32) NOT NULL,
                size VARCHAR(50),
                price_amount NUMERIC(12, 2) NOT NULL,
                price_currency CHAR(3) NOT NULL DEFAULT 'GBP',
                status VARCHAR(16) NOT NULL DEFAULT 'DRAFT',
                images TEXT[] NOT NULL DEFAULT '{}',
                view_count BIGINT NOT NULL DEFAULT 0,
                version BIGINT NOT NULL DEFAULT 1,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_listings_seller ON listings(seller_id, created_at DESC)",
            "CREATE INDEX IF NOT EXISTS idx_listings_status ON listings(status, created_at DESC)",
            "CREATE INDEX IF NOT EXISTS idx_listings_price ON listings(price_amount)",
        ] {
            sqlx::query(index).execute(&self.pool).await?;
        }

        Ok(())
    }

    async fn current_version(&self, id: &ListingId) -> RepositoryResult<Option<i64>> {
        let version = sqlx::query_scalar::<_, i64>("SELECT version FROM listings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(version)
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    seller_id: Uuid,
    title: String,
    description: String,
    brand: Option<String>,
    category: String,
    condition: String,
    size: Option<String>,
    price_amount: Decimal,
    price_currency: String,
    status: String,
    images: Vec<String>,
    view_count: i64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = RepositoryError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::errors::ValidationError| {
            RepositoryError::backend(format!("Corrupt listing row {}: {}", row.id, e))
        };

        let currency = Currency::new(&row.price_currency).map_err(corrupt)?;
        let images = row
            .images
            .iter()
            .map(|key| ImageKey::new(key.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        Ok(Listing {
            id: ListingId::from_uuid(row.id),
            seller_id: UserId::from_uuid(row.seller_id),
            category: row.category.parse().map_err(corrupt)?,
            condition: row.condition.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            price: Price::new(row.price_amount, currency).map_err(corrupt)?,
            images,
            view_count: u64::try_from(row.view_count).unwrap_or_default(),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
            title: row.title,
            description: row.description,
            brand: row.brand,
            size: row.size,
        })
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Append the WHERE clause for `filter`; mirrors `ListingFilter::matches`
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a ListingFilter) {
    qb.push(" WHERE TRUE");

    if let Some(seller_id) = &filter.seller_id {
        qb.push(" AND seller_id = ").push_bind(*seller_id.as_uuid());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(condition) = filter.condition {
        qb.push(" AND condition = ").push_bind(condition.as_str());
    }
    if let Some(size) = &filter.size {
        qb.push(" AND size = ").push_bind(size.as_str());
    }
    if let Some(brand) = &filter.brand {
        qb.push(" AND brand ILIKE ").push_bind(escape_like(brand));
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND price_amount >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND price_amount <= ").push_bind(max);
    }
    if let Some(search) = &filter.search {
        let pattern = escape_like(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR brand ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ListingRepository for SqlListingRepository {
    async fn create(&self, listing: NewListing) -> RepositoryResult<Listing> {
        let id = ListingId::generate();
        let images: Vec<String> = listing
            .images
            .iter()
            .map(|key| key.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            INSERT INTO listings (
                id, seller_id, title, description, brand, category, condition, size,
                price_amount, price_currency, status, images
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(listing.seller_id.as_uuid())
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.brand)
        .bind(listing.category.as_str())
        .bind(listing.condition.as_str())
        .bind(&listing.size)
        .bind(listing.price.amount())
        .bind(listing.price.currency().as_str())
        .bind(listing.status.as_str())
        .bind(&images)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_by_id(&self, id: &ListingId) -> RepositoryResult<Listing> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {} FROM listings WHERE id = $1",
            LISTING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound { id: *id })?.try_into()
    }

    async fn update_fields(
        &self,
        id: &ListingId,
        update: ListingUpdate,
        expected_version: Option<i64>,
    ) -> RepositoryResult<Listing> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE listings SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(title) = update.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = update.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(brand) = update.brand {
                set.push("brand = ").push_bind_unseparated(brand);
            }
            if let Some(category) = update.category {
                set.push("category = ").push_bind_unseparated(category.as_str());
            }
            if let Some(condition) = update.condition {
                set.push("condition = ").push_bind_unseparated(condition.as_str());
            }
            if let Some(size) = update.size {
                set.push("size = ").push_bind_unseparated(size);
            }
            if let Some(price) = update.price {
                set.push("price_amount = ").push_bind_unseparated(price.amount());
                set.push("price_currency = ")
                    .push_bind_unseparated(price.currency().as_str().to_string());
            }
            if let Some(status) = update.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(images) = update.images {
                let images: Vec<String> =
                    images.iter().map(|key| key.as_str().to_string()).collect();
                set.push("images = ").push_bind_unseparated(images);
            }
            set.push("version = version + 1");
            set.push("updated_at = NOW()");
        }

        qb.push(" WHERE id = ").push_bind(*id.as_uuid());
        if let Some(expected) = expected_version {
            qb.push(" AND version = ").push_bind(expected);
        }
        qb.push(" RETURNING ").push(LISTING_COLUMNS);

        let row = qb
            .build_query_as::<ListingRow>()
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => match (self.current_version(id).await?, expected_version) {
                (Some(actual), Some(expected)) => Err(RepositoryError::VersionConflict {
                    id: *id,
                    expected,
                    actual,
                }),
                _ => Err(RepositoryError::NotFound { id: *id }),
            },
        }
    }

    async fn increment_view_count(&self, id: &ListingId) -> RepositoryResult<Listing> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "UPDATE listings SET view_count = view_count + 1 WHERE id = $1 RETURNING {}",
            LISTING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound { id: *id })?.try_into()
    }

    async fn find_many(&self, query: &ListingQuery) -> RepositoryResult<ListingPage<Listing>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM listings");
        push_filter(&mut count, &query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        select.push(LISTING_COLUMNS).push(" FROM listings");
        push_filter(&mut select, &query.filter);
        select
            .push(" ORDER BY ")
            .push(query.sort.field.column())
            .push(" ")
            .push(query.sort.order.keyword())
            .push(", id ")
            .push(query.sort.order.keyword())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build_query_as::<ListingRow>()
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Listing::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(ListingPage {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_patterns_are_escaped() {
        assert_eq!(escape_like("levi"), "%levi%");
        assert_eq!(escape_like("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_filter_sql_binds_every_criterion() {
        let filter = ListingFilter::builder()
            .brand("levi".to_string())
            .search("denim".to_string())
            .min_price(Decimal::new(1000, 2))
            .build();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM listings");
        push_filter(&mut qb, &filter);

        let sql = qb.sql();
        assert!(sql.contains("brand ILIKE $1"));
        assert!(sql.contains("price_amount >= $2"));
        assert!(sql.contains("title ILIKE $3 OR description ILIKE $4 OR brand ILIKE $5"));
    }
}
