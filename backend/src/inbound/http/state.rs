//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, AuthenticationGate, BusinessCommand, BusinessQuery, BusinessRepository,
    PasswordHasher, RatingReconciler, ReviewCommand, ReviewQuery, ReviewRepository, TokenCodec,
    UserRepository,
};
use crate::domain::{
    AccountService, BusinessDirectoryService, ReviewIngestionService, TokenAuthenticationGate,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub businesses: Arc<dyn BusinessQuery>,
    pub business_commands: Arc<dyn BusinessCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
    pub review_commands: Arc<dyn ReviewCommand>,
    pub reconciler: Arc<dyn RatingReconciler>,
    pub accounts: Arc<dyn AccountCommand>,
    pub authentication: Arc<dyn AuthenticationGate>,
}

/// Driven adapters the domain services are built over.
pub struct HttpStatePorts<B, R, U, H, T> {
    pub businesses: Arc<B>,
    pub reviews: Arc<R>,
    pub users: Arc<U>,
    pub hasher: Arc<H>,
    pub tokens: Arc<T>,
    pub clock: Arc<dyn Clock>,
    /// Lifetime of issued bearer tokens.
    pub token_ttl: Duration,
}

impl HttpState {
    /// Build every domain service over `ports`.
    pub fn new<B, R, U, H, T>(ports: HttpStatePorts<B, R, U, H, T>) -> Self
    where
        B: BusinessRepository + 'static,
        R: ReviewRepository + 'static,
        U: UserRepository + 'static,
        H: PasswordHasher + 'static,
        T: TokenCodec + 'static,
    {
        let HttpStatePorts {
            businesses,
            reviews,
            users,
            hasher,
            tokens,
            clock,
            token_ttl,
        } = ports;
        let directory = Arc::new(BusinessDirectoryService::new(businesses.clone()));
        let ingestion = Arc::new(ReviewIngestionService::new(
            businesses,
            reviews,
            clock.clone(),
        ));
        Self {
            businesses: directory.clone(),
            business_commands: directory,
            reviews: ingestion.clone(),
            review_commands: ingestion.clone(),
            reconciler: ingestion,
            accounts: Arc::new(AccountService::new(
                users,
                hasher,
                tokens.clone(),
                clock.clone(),
                token_ttl,
            )),
            authentication: Arc::new(TokenAuthenticationGate::new(tokens, clock)),
        }
    }
}
