use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::RepositoryResult,
        models::{SellerSummary, TransactionSummary},
        value_objects::{ListingId, UserId},
    },
    ports::repositories::{SellerRepository, TransactionRepository},
};

/// In-memory stand-in for the payments subsystem's transaction records
#[derive(Clone, Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<Vec<TransactionSummary>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transaction, replacing any earlier one with the same id
    pub async fn upsert(&self, transaction: TransactionSummary) {
        let mut transactions = self.transactions.write().await;
        transactions.retain(|t| t.id != transaction.id);
        transactions.push(transaction);
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_blocking_transaction(
        &self,
        listing_id: &ListingId,
    ) -> RepositoryResult<Option<TransactionSummary>> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .find(|t| t.listing_id == *listing_id && t.status.blocks_listing_deletion())
            .cloned())
    }
}

/// In-memory stand-in for the user directory
#[derive(Clone, Default)]
pub struct InMemorySellerRepository {
    sellers: Arc<RwLock<HashMap<UserId, SellerSummary>>>,
}

impl InMemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, seller: SellerSummary) {
        self.sellers.write().await.insert(seller.id, seller);
    }
}

#[async_trait]
impl SellerRepository for InMemorySellerRepository {
    async fn get_seller_summaries(&self, ids: &[UserId]) -> RepositoryResult<Vec<SellerSummary>> {
        let sellers = self.sellers.read().await;
        Ok(ids.iter().filter_map(|id| sellers.get(id).cloned()).collect())
    }
}
