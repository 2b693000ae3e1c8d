use crate::domain::{errors::RepositoryResult, models::SellerSummary, value_objects::UserId};
use async_trait::async_trait;

/// Read-only lookup of public seller profiles
#[async_trait]
pub trait SellerRepository: Send + Sync + 'static {
    /// Summaries for the given users. Unknown ids are simply absent.
    async fn get_seller_summaries(&self, ids: &[UserId]) -> RepositoryResult<Vec<SellerSummary>>;
}
