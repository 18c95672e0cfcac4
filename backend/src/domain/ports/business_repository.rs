//! Port for business listing persistence.
//!
//! Adapters store listings and their derived rating aggregate. Only the review
//! aggregator calls [`BusinessRepository::refresh_rating`].

use async_trait::async_trait;

use crate::domain::{Business, BusinessId, RatingSummary, SearchQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by business repository adapters.
    pub enum BusinessRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "business repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "business repository query failed: {message}",
        /// The listing targeted by an update does not exist.
        Missing { id: String } => "business {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Persist a new listing.
    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &BusinessId)
    -> Result<Option<Business>, BusinessRepositoryError>;

    /// Listings matching `query`, ordered by name case-insensitively.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, BusinessRepositoryError>;

    /// Highest-rated listings: average descending, then review count
    /// descending, at most `limit` entries.
    async fn featured(&self, limit: usize) -> Result<Vec<Business>, BusinessRepositoryError>;

    /// Identifiers of every stored listing.
    async fn list_ids(&self) -> Result<Vec<BusinessId>, BusinessRepositoryError>;

    /// Recompute a listing's aggregate from every stored review and persist it.
    ///
    /// The ratings are read and the aggregate written as one step that is
    /// serialised per listing by the store itself, so writers in other
    /// processes cannot interleave. The result is
    /// [`RatingSummary::from_ratings`] over the full review set.
    ///
    /// Returns [`BusinessRepositoryError::Missing`] when no listing has `id`.
    async fn refresh_rating(&self, id: &BusinessId)
    -> Result<RatingSummary, BusinessRepositoryError>;
}
