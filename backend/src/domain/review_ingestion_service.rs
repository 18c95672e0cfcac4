//! Review ingestion and rating aggregation.
//!
//! Every accepted review triggers a full recomputation of the business
//! aggregate from the stored ratings rather than an incremental update, so
//! the aggregate can always be rebuilt from ground truth. The recomputation
//! is a single [`BusinessRepository::refresh_rating`] call, which the store
//! serialises per business across processes; two concurrent reviews for the
//! same business therefore both appear in the final aggregate, even when a
//! separate reconciliation process runs alongside. Within one process the
//! insert and refresh additionally run under [`BusinessLocks`] so requests
//! for the same business queue here rather than on store row locks.
//!
//! If the aggregate write fails after the review is stored the call fails
//! and the aggregate stays stale until the next review for that business or
//! an explicit [`RatingReconciler::reconcile`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    BusinessRepository, BusinessRepositoryError, RatingReconciler, ReconcileReport,
    ReviewCommand, ReviewQuery, ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{
    Business, BusinessId, BusinessLocks, Error, Identity, RatingSummary, Review, ReviewId,
    ReviewSubmission,
};

/// Review service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewIngestionService<B, R> {
    businesses: Arc<B>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
    locks: Arc<BusinessLocks>,
}

impl<B, R> ReviewIngestionService<B, R> {
    /// Create a service with its own lock table.
    pub fn new(businesses: Arc<B>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_locks(businesses, reviews, clock, Arc::new(BusinessLocks::new()))
    }

    /// Create a service sharing `locks` with other instances in this process.
    pub fn with_locks(
        businesses: Arc<B>,
        reviews: Arc<R>,
        clock: Arc<dyn Clock>,
        locks: Arc<BusinessLocks>,
    ) -> Self {
        Self {
            businesses,
            reviews,
            clock,
            locks,
        }
    }
}

pub(crate) fn map_business_error(error: BusinessRepositoryError) -> Error {
    match error {
        BusinessRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("business repository unavailable: {message}"))
        }
        BusinessRepositoryError::Query { message } => {
            Error::internal(format!("business repository error: {message}"))
        }
        BusinessRepositoryError::Missing { .. } => Error::not_found("business not found"),
    }
}

fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

impl<B, R> ReviewIngestionService<B, R>
where
    B: BusinessRepository,
    R: ReviewRepository,
{
    async fn require_business(&self, id: &BusinessId) -> Result<Business, Error> {
        self.businesses
            .find_by_id(id)
            .await
            .map_err(map_business_error)?
            .ok_or_else(|| Error::not_found(format!("business {id} not found")))
    }

    /// Recompute the aggregate from every stored rating and persist it.
    async fn recompute(&self, id: &BusinessId) -> Result<RatingSummary, Error> {
        self.businesses
            .refresh_rating(id)
            .await
            .map_err(map_business_error)
    }

    async fn reconcile_locked(&self, id: &BusinessId) -> Result<(Business, bool), Error> {
        let _guard = self.locks.lock(*id).await;
        let stored = self.require_business(id).await?;
        let summary = self.recompute(id).await?;
        let repaired = stored.rating != summary;
        if repaired {
            info!(
                business_id = %id,
                stored_average = %stored.rating.average(),
                stored_count = stored.rating.review_count(),
                average = %summary.average(),
                count = summary.review_count(),
                "repaired stale rating aggregate"
            );
        }
        Ok((stored.with_rating(summary), repaired))
    }
}

#[async_trait]
impl<B, R> ReviewCommand for ReviewIngestionService<B, R>
where
    B: BusinessRepository,
    R: ReviewRepository,
{
    async fn submit(
        &self,
        author: &Identity,
        business_id: &BusinessId,
        submission: ReviewSubmission,
    ) -> Result<Review, Error> {
        // Listings are never deleted, so existence need not be rechecked under the lock.
        self.require_business(business_id).await?;

        let _guard = self.locks.lock(*business_id).await;
        let review = Review {
            id: ReviewId::random(),
            business_id: *business_id,
            author_id: author.user_id.clone(),
            username: author.username.clone(),
            rating: submission.rating,
            comment: submission.comment,
            created_at: self.clock.utc(),
        };
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;

        let summary = self.recompute(business_id).await.inspect_err(|error| {
            warn!(
                business_id = %business_id,
                review_id = %review.id,
                %error,
                "review stored but aggregate refresh failed; aggregate is stale until repaired"
            );
        })?;

        debug!(
            business_id = %business_id,
            review_id = %review.id,
            average = %summary.average(),
            count = summary.review_count(),
            "review ingested"
        );
        Ok(review)
    }
}

#[async_trait]
impl<B, R> ReviewQuery for ReviewIngestionService<B, R>
where
    B: BusinessRepository,
    R: ReviewRepository,
{
    async fn list_for_business(&self, business_id: &BusinessId) -> Result<Vec<Review>, Error> {
        self.require_business(business_id).await?;
        self.reviews
            .list_for_business(business_id)
            .await
            .map_err(map_review_error)
    }
}

#[async_trait]
impl<B, R> RatingReconciler for ReviewIngestionService<B, R>
where
    B: BusinessRepository,
    R: ReviewRepository,
{
    async fn reconcile(&self, business_id: &BusinessId) -> Result<Business, Error> {
        let (business, _) = self.reconcile_locked(business_id).await?;
        Ok(business)
    }

    async fn reconcile_all(&self) -> Result<ReconcileReport, Error> {
        let ids = self
            .businesses
            .list_ids()
            .await
            .map_err(map_business_error)?;
        let mut report = ReconcileReport::default();
        for id in ids {
            let (_, repaired) = self.reconcile_locked(&id).await?;
            report.checked += 1;
            if repaired {
                report.repaired += 1;
            }
        }
        info!(
            checked = report.checked,
            repaired = report.repaired,
            "rating reconciliation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "review_ingestion_service_tests.rs"]
mod tests;
