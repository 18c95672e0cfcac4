//! Tests for account registration and login.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenCodec, MockUserRepository};
use crate::domain::{ErrorCode, PasswordHash};
use crate::outbound::memory::InMemoryStore;
use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Hasher double that prefixes the password so verification is checkable.
fn prefix_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
    hasher
        .expect_verify()
        .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
    hasher
}

fn username_codec() -> MockTokenCodec {
    let mut codec = MockTokenCodec::new();
    codec
        .expect_encode()
        .returning(|claims| Ok(format!("token-for-{}", claims.identity.username)));
    codec
}

type Service = AccountService<InMemoryStore, MockPasswordHasher, MockTokenCodec>;

#[fixture]
fn service() -> Service {
    AccountService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(prefix_hasher()),
        Arc::new(username_codec()),
        Arc::new(FixedClock(now())),
        Duration::hours(1),
    )
}

fn registration(email: &str) -> Registration {
    Registration::try_from_parts("Ada", email, "correct horse").expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn register_issues_session(service: Service) {
    let session = service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");

    assert_eq!(session.token, "token-for-Ada");
    assert_eq!(session.expires_at, now() + Duration::hours(1));
    assert_eq!(session.user.email.as_ref(), "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn duplicate_email_conflicts(service: Service) {
    service
        .register(registration("ada@example.com"))
        .await
        .expect("first registration");
    let err = service
        .register(registration("ADA@example.com"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn login_round_trips_registered_account(service: Service) {
    let registered = service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "correct horse").expect("valid");
    let session = service.login(credentials).await.expect("logged in");
    assert_eq!(session.user, registered.user);
}

#[rstest]
#[case("ada@example.com", "wrong horse")]
#[case("nobody@example.com", "correct horse")]
#[tokio::test]
async fn bad_credentials_are_unauthorized(
    service: Service,
    #[case] email: &str,
    #[case] password: &str,
) {
    service
        .register(registration("ada@example.com"))
        .await
        .expect("registered");
    let credentials = LoginCredentials::try_from_parts(email, password).expect("valid");
    let err = service.login(credentials).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("refused")));
    let service = AccountService::new(
        Arc::new(users),
        Arc::new(prefix_hasher()),
        Arc::new(username_codec()),
        Arc::new(FixedClock(now())),
        Duration::hours(1),
    );
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "correct horse").expect("valid");
    let err = service.login(credentials).await.expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn hashing_failure_stores_nothing() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Err(PasswordHashError::hashing("out of memory")));
    let mut users = MockUserRepository::new();
    users.expect_insert().times(0);
    let service = AccountService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(username_codec()),
        Arc::new(FixedClock(now())),
        Duration::hours(1),
    );
    let err = service
        .register(registration("ada@example.com"))
        .await
        .expect_err("hashing failed");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
