//! Builders wiring HTTP state over PostgreSQL or in-process adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::warn;

use pulse_backend::inbound::http::state::{HttpState, HttpStatePorts};
use pulse_backend::outbound::memory::InMemoryStore;
use pulse_backend::outbound::persistence::{
    DieselBusinessRepository, DieselReviewRepository, DieselUserRepository,
};
use pulse_backend::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Build handler state, using the database when a pool is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let tokens = Arc::new(JwtTokenCodec::from_secret(&config.token_secret));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let clock = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => HttpState::new(HttpStatePorts {
            businesses: Arc::new(DieselBusinessRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            hasher,
            tokens,
            clock,
            token_ttl: config.token_ttl,
        }),
        None => {
            warn!("no database configured; listings, reviews and accounts live in memory");
            let store = InMemoryStore::new();
            HttpState::new(HttpStatePorts {
                businesses: Arc::new(store.clone()),
                reviews: Arc::new(store.clone()),
                users: Arc::new(store),
                hasher,
                tokens,
                clock,
                token_ttl: config.token_ttl,
            })
        }
    }
}
