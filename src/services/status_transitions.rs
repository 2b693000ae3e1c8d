use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        models::{Listing, ListingStatus, ListingUpdate},
        value_objects::{ListingId, UserId},
    },
    ports::repositories::ListingRepository,
};

/// Outcome of checking a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Already in the target state
    Unchanged,
    Apply(ListingStatus),
}

/// Validates and applies moves along the listing status table
#[derive(Clone)]
pub struct StatusTransitionEngine {
    repository: Arc<dyn ListingRepository>,
}

impl StatusTransitionEngine {
    pub fn new(repository: Arc<dyn ListingRepository>) -> Self {
        Self { repository }
    }

    /// Pure check of `from -> to`. Same-state requests are a no-op.
    pub fn plan(from: ListingStatus, to: ListingStatus) -> ListingResult<TransitionPlan> {
        if from == to {
            return Ok(TransitionPlan::Unchanged);
        }
        if !from.can_transition_to(to) {
            return Err(ListingError::InvalidTransition { from, to });
        }
        Ok(TransitionPlan::Apply(to))
    }

    /// Load, authorize and move `listing_id` to `target`.
    ///
    /// The write is conditioned on the version read here, so a concurrent
    /// change surfaces as `ConcurrentModification` instead of being
    /// overwritten.
    pub async fn transition(
        &self,
        listing_id: &ListingId,
        caller: &UserId,
        target: ListingStatus,
    ) -> ListingResult<Listing> {
        let listing = self.repository.get_by_id(listing_id).await?;
        listing.ensure_owned_by(caller, "update")?;

        match Self::plan(listing.status, target)? {
            TransitionPlan::Unchanged => {
                debug!(listing_id = %listing_id, status = %target, "Status unchanged");
                Ok(listing)
            }
            TransitionPlan::Apply(status) => {
                let update = ListingUpdate::builder().status(status).build();
                let updated = self
                    .repository
                    .update_fields(listing_id, update, Some(listing.version))
                    .await?;
                info!(
                    listing_id = %listing_id,
                    from = %listing.status,
                    to = %status,
                    "Listing status changed"
                );
                Ok(updated)
            }
        }
    }
}
