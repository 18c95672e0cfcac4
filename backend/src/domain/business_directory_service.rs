//! Listing creation and discovery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{BusinessCommand, BusinessQuery, BusinessRepository};
use crate::domain::review_ingestion_service::map_business_error;
use crate::domain::search::FEATURED_LIMIT;
use crate::domain::{Business, BusinessDraft, BusinessId, Error, Identity, SearchQuery};

/// Directory service implementing the listing driving ports.
#[derive(Clone)]
pub struct BusinessDirectoryService<B> {
    businesses: Arc<B>,
}

impl<B> BusinessDirectoryService<B> {
    pub fn new(businesses: Arc<B>) -> Self {
        Self { businesses }
    }
}

#[async_trait]
impl<B> BusinessCommand for BusinessDirectoryService<B>
where
    B: BusinessRepository,
{
    async fn create(&self, author: &Identity, draft: BusinessDraft) -> Result<Business, Error> {
        let business = draft.into_business(BusinessId::random());
        self.businesses
            .insert(&business)
            .await
            .map_err(map_business_error)?;
        info!(
            business_id = %business.id,
            user_id = %author.user_id,
            "listing created"
        );
        Ok(business)
    }
}

#[async_trait]
impl<B> BusinessQuery for BusinessDirectoryService<B>
where
    B: BusinessRepository,
{
    async fn get(&self, id: &BusinessId) -> Result<Business, Error> {
        self.businesses
            .find_by_id(id)
            .await
            .map_err(map_business_error)?
            .ok_or_else(|| Error::not_found(format!("business {id} not found")))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, Error> {
        self.businesses
            .search(query)
            .await
            .map_err(map_business_error)
    }

    async fn featured(&self) -> Result<Vec<Business>, Error> {
        self.businesses
            .featured(FEATURED_LIMIT)
            .await
            .map_err(map_business_error)
    }
}
