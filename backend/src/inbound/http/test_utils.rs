//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::{BusinessRepository, TokenCodec};
use crate::domain::{Business, BusinessDraft, BusinessId, Identity, PriceRange, TokenClaims, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

const TEST_SECRET: &[u8] = b"pulse-square-http-test-secret-0123456789";

/// Real services over an in-memory store and a fixed signing key.
pub struct TestApi {
    pub store: InMemoryStore,
    pub state: HttpState,
    tokens: Arc<JwtTokenCodec>,
}

impl TestApi {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let tokens = Arc::new(JwtTokenCodec::from_secret(&Zeroizing::new(
            TEST_SECRET.to_vec(),
        )));
        let state = HttpState::new(HttpStatePorts {
            businesses: Arc::new(store.clone()),
            reviews: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: tokens.clone(),
            clock: Arc::new(DefaultClock),
            token_ttl: Duration::hours(1),
        });
        Self {
            store,
            state,
            tokens,
        }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    /// Store a listing with an empty aggregate.
    pub async fn seed(&self, name: &str, category: &str, location: &str) -> Business {
        let business = BusinessDraft::try_new(
            name,
            category,
            location,
            "555-0100",
            Some(PriceRange::Moderate),
        )
        .expect("valid listing")
        .into_business(BusinessId::random());
        self.store
            .insert(&business)
            .await
            .expect("in-memory insert succeeds");
        business
    }

    /// Sign a live token for a fresh user called `username`.
    pub fn token_for(&self, username: &str) -> String {
        self.token_expiring(username, Utc::now() + Duration::hours(1))
    }

    /// Sign a correctly keyed token for `username` that expired a minute ago.
    pub fn expired_token_for(&self, username: &str) -> String {
        self.token_expiring(username, Utc::now() - Duration::minutes(1))
    }

    fn token_expiring(&self, username: &str, expires_at: DateTime<Utc>) -> String {
        let claims = TokenClaims {
            identity: Identity {
                user_id: UserId::random(),
                username: username.to_owned(),
            },
            issued_at: expires_at - Duration::hours(1),
            expires_at,
        };
        self.tokens.encode(&claims).expect("token encodes")
    }
}

/// Initialise an Actix test service mounting the API scope over `$api`.
macro_rules! init_api {
    ($api:expr) => {
        ::actix_web::test::init_service(
            ::actix_web::App::new()
                .app_data($api.data())
                .service($crate::inbound::http::api_scope()),
        )
        .await
    };
}
pub(crate) use init_api;
