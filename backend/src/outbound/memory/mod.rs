//! In-process store implementing every persistence port.
//!
//! Used when no database is configured and by tests. Data lives for the
//! lifetime of the process. Ordering and matching rules come from
//! [`crate::domain::search`] so results agree with the PostgreSQL adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    BusinessRepository, BusinessRepositoryError, ReviewRepository, ReviewRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::search::{featured_order, listing_order};
use crate::domain::{
    Business, BusinessId, EmailAddress, Rating, RatingSummary, Review, SearchQuery,
    StoredCredentials,
};

#[derive(Debug, Default)]
struct State {
    businesses: HashMap<BusinessId, Business>,
    reviews: Vec<Review>,
    users: HashMap<EmailAddress, StoredCredentials>,
}

/// Shared in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite a stored aggregate without touching reviews.
    ///
    /// Lets tests and demos simulate an aggregate left stale by a failed write.
    pub fn force_rating(&self, id: &BusinessId, summary: RatingSummary) -> bool {
        match self.state().businesses.get_mut(id) {
            Some(business) => {
                business.rating = summary;
                true
            }
            None => false,
        }
    }

    /// Number of stored reviews for a business.
    pub fn review_count(&self, id: &BusinessId) -> usize {
        self.state()
            .reviews
            .iter()
            .filter(|review| review.business_id == *id)
            .count()
    }
}

#[async_trait]
impl BusinessRepository for InMemoryStore {
    async fn insert(&self, business: &Business) -> Result<(), BusinessRepositoryError> {
        let mut state = self.state();
        if state.businesses.contains_key(&business.id) {
            return Err(BusinessRepositoryError::query("duplicate business id"));
        }
        state.businesses.insert(business.id, business.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &BusinessId,
    ) -> Result<Option<Business>, BusinessRepositoryError> {
        Ok(self.state().businesses.get(id).cloned())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut matches: Vec<_> = self
            .state()
            .businesses
            .values()
            .filter(|business| query.matches(business))
            .cloned()
            .collect();
        matches.sort_by(listing_order);
        Ok(matches)
    }

    async fn featured(&self, limit: usize) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut all: Vec<_> = self.state().businesses.values().cloned().collect();
        all.sort_by(featured_order);
        all.truncate(limit);
        Ok(all)
    }

    async fn list_ids(&self) -> Result<Vec<BusinessId>, BusinessRepositoryError> {
        let mut ids: Vec<_> = self.state().businesses.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    async fn refresh_rating(
        &self,
        id: &BusinessId,
    ) -> Result<RatingSummary, BusinessRepositoryError> {
        // One guard covers the read and the write.
        let mut state = self.state();
        let ratings: Vec<Rating> = state
            .reviews
            .iter()
            .filter(|review| review.business_id == *id)
            .map(|review| review.rating)
            .collect();
        let summary = RatingSummary::from_ratings(&ratings);
        let business = state
            .businesses
            .get_mut(id)
            .ok_or_else(|| BusinessRepositoryError::missing(id.to_string()))?;
        business.rating = summary;
        Ok(summary)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.state();
        if !state.businesses.contains_key(&review.business_id) {
            return Err(ReviewRepositoryError::query("review references unknown business"));
        }
        state.reviews.push(review.clone());
        Ok(())
    }

    async fn list_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut reviews: Vec<_> = self
            .state()
            .reviews
            .iter()
            .filter(|review| review.business_id == *business_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order reversed for equal timestamps.
        reviews.reverse();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, credentials: &StoredCredentials) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        let email = credentials.user.email.clone();
        if state.users.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email(email.to_string()));
        }
        state.users.insert(email, credentials.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self.state().users.get(email).cloned())
    }
}
