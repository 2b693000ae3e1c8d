use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ListingId;

/// State of an external sale transaction referencing a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    PaymentProcessing,
    Escrow,
    Shipped,
    Delivered,
    Completed,
    Disputed,
    Refunded,
    Cancelled,
}

impl TransactionStatus {
    /// Non-terminal states that keep a listing from being deleted
    pub const BLOCKING: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::PaymentProcessing,
        TransactionStatus::Escrow,
        TransactionStatus::Shipped,
        TransactionStatus::Disputed,
    ];

    pub fn blocks_listing_deletion(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::PaymentProcessing => "PAYMENT_PROCESSING",
            TransactionStatus::Escrow => "ESCROW",
            TransactionStatus::Shipped => "SHIPPED",
            TransactionStatus::Delivered => "DELIVERED",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Disputed => "DISPUTED",
            TransactionStatus::Refunded => "REFUNDED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        use TransactionStatus::*;
        [
            Pending,
            PaymentProcessing,
            Escrow,
            Shipped,
            Delivered,
            Completed,
            Disputed,
            Refunded,
            Cancelled,
        ]
        .into_iter()
        .find(|s| s.as_str() == value)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal view of a transaction, enough to decide whether it blocks deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    pub id: uuid::Uuid,
    pub listing_id: ListingId,
    pub status: TransactionStatus,
}
