//! Driving ports for listing management and discovery.
//!
//! Inbound adapters call these without knowing which store backs them, so
//! handler tests can substitute doubles.

use async_trait::async_trait;

use crate::domain::{Business, BusinessDraft, BusinessId, Error, Identity, SearchQuery};

/// Use-case port for creating listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessCommand: Send + Sync {
    /// Store a validated draft with a fresh id and an empty aggregate.
    async fn create(&self, author: &Identity, draft: BusinessDraft) -> Result<Business, Error>;
}

/// Use-case port for reading listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessQuery: Send + Sync {
    /// Fetch one listing or fail with `not_found`.
    async fn get(&self, id: &BusinessId) -> Result<Business, Error>;

    /// Listings matching `query`; a blank query returns everything.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, Error>;

    /// The best-rated listings for the home page.
    async fn featured(&self) -> Result<Vec<Business>, Error>;
}
