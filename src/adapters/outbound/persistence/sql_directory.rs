use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{RepositoryError, RepositoryResult},
        models::{SellerSummary, TransactionStatus, TransactionSummary},
        value_objects::{ListingId, UserId},
    },
    ports::repositories::{SellerRepository, TransactionRepository},
};

/// Reads the payments subsystem's `transactions` table
#[derive(Clone)]
pub struct SqlTransactionRepository {
    pool: PgPool,
}

impl SqlTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the columns this service reads, if the owning subsystem has
    /// not already done so
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id UUID PRIMARY KEY,
                listing_id UUID NOT NULL,
                status VARCHAR(32) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_listing ON transactions(listing_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for SqlTransactionRepository {
    async fn find_blocking_transaction(
        &self,
        listing_id: &ListingId,
    ) -> RepositoryResult<Option<TransactionSummary>> {
        let blocking: Vec<String> = TransactionStatus::BLOCKING
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, status FROM transactions
            WHERE listing_id = $1 AND status = ANY($2)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(listing_id.as_uuid())
        .bind(&blocking)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, status)| {
            let status = TransactionStatus::parse(&status).ok_or_else(|| {
                RepositoryError::backend(format!("Unknown transaction status {}", status))
            })?;
            Ok(TransactionSummary {
                id,
                listing_id: *listing_id,
                status,
            })
        })
        .transpose()
    }
}

/// Reads public profile columns from the `users` table
#[derive(Clone)]
pub struct SqlSellerRepository {
    pool: PgPool,
}

impl SqlSellerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username VARCHAR(50),
                display_name VARCHAR(100),
                avatar_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SellerRow {
    id: Uuid,
    username: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl SellerRepository for SqlSellerRepository {
    async fn get_seller_summaries(&self, ids: &[UserId]) -> RepositoryResult<Vec<SellerSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, SellerRow>(
            r#"
            SELECT id, username, display_name, avatar_url, created_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SellerSummary {
                id: UserId::from_uuid(row.id),
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
                created_at: row.created_at,
            })
            .collect())
    }
}
