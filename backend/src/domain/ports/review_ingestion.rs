//! Driving ports for review submission, listing and aggregate repair.

use async_trait::async_trait;

use crate::domain::{Business, BusinessId, Error, Identity, Review, ReviewSubmission};

/// Use-case port for accepting reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Store a review and bring the business aggregate up to date.
    ///
    /// Fails with `not_found` when the business does not exist; nothing is
    /// written in that case.
    async fn submit(
        &self,
        author: &Identity,
        business_id: &BusinessId,
        submission: ReviewSubmission,
    ) -> Result<Review, Error>;
}

/// Use-case port for reading reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews for a business, newest first.
    async fn list_for_business(&self, business_id: &BusinessId) -> Result<Vec<Review>, Error>;
}

/// Outcome of reconciling every stored aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Listings whose aggregate was recomputed.
    pub checked: usize,
    /// Listings whose stored aggregate differed and was rewritten.
    pub repaired: usize,
}

/// Use-case port for recomputing aggregates from ground truth.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingReconciler: Send + Sync {
    /// Recompute and store the aggregate for one business.
    async fn reconcile(&self, business_id: &BusinessId) -> Result<Business, Error>;

    /// Recompute every aggregate, stopping at the first store failure.
    async fn reconcile_all(&self) -> Result<ReconcileReport, Error>;
}
