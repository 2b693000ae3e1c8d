use crate::domain::{
    errors::RepositoryResult, models::TransactionSummary, value_objects::ListingId,
};
use async_trait::async_trait;

/// Read-only view over the sale transactions owned by the payments subsystem
#[async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// First transaction on the listing whose status blocks deletion, if any
    async fn find_blocking_transaction(
        &self,
        listing_id: &ListingId,
    ) -> RepositoryResult<Option<TransactionSummary>>;
}
