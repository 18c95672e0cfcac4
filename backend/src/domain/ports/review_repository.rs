//! Port for review persistence.

use async_trait::async_trait;

use crate::domain::{BusinessId, Review};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

/// Review storage. Reviews are append-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new review.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Every review for a business, newest first.
    async fn list_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;
}
