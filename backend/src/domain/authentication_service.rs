//! Bearer token verification.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{AuthenticationGate, TokenCodec};
use crate::domain::{Error, Identity};

/// Gate resolving bearer tokens through a [`TokenCodec`].
///
/// The codec proves the token was issued by this service; expiry is judged
/// here against the injected clock.
#[derive(Clone)]
pub struct TokenAuthenticationGate<T> {
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TokenAuthenticationGate<T> {
    pub fn new(tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { tokens, clock }
    }
}

impl<T> AuthenticationGate for TokenAuthenticationGate<T>
where
    T: TokenCodec,
{
    fn authenticate(&self, token: &str) -> Result<Identity, Error> {
        let claims = self.tokens.decode(token).map_err(|error| {
            debug!(%error, "rejected bearer token");
            Error::unauthorized("invalid token")
        })?;
        if claims.expires_at <= self.clock.utc() {
            return Err(Error::unauthorized("token expired"));
        }
        Ok(claims.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTokenCodec, TokenCodecError};
    use crate::domain::{ErrorCode, TokenClaims, UserId};
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use rstest::rstest;

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
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn gate_returning(expires_in: Duration) -> TokenAuthenticationGate<MockTokenCodec> {
        let mut codec = MockTokenCodec::new();
        codec.expect_decode().returning(move |_| {
            Ok(TokenClaims {
                identity: Identity {
                    user_id: UserId::random(),
                    username: "ada".to_owned(),
                },
                issued_at: now() - Duration::minutes(5),
                expires_at: now() + expires_in,
            })
        });
        TokenAuthenticationGate::new(Arc::new(codec), Arc::new(FixedClock(now())))
    }

    #[rstest]
    fn live_token_resolves_identity() {
        let identity = gate_returning(Duration::minutes(30))
            .authenticate("token")
            .expect("authenticated");
        assert_eq!(identity.username, "ada");
    }

    #[rstest]
    #[case(Duration::zero())]
    #[case(Duration::seconds(-1))]
    fn expired_token_is_rejected(#[case] expires_in: Duration) {
        let err = gate_returning(expires_in)
            .authenticate("token")
            .expect_err("expired");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "token expired");
    }

    #[rstest]
    fn undecodable_token_is_rejected() {
        let mut codec = MockTokenCodec::new();
        codec
            .expect_decode()
            .return_once(|_| Err(TokenCodecError::invalid_signature()));
        let gate = TokenAuthenticationGate::new(Arc::new(codec), Arc::new(FixedClock(now())));
        let err = gate.authenticate("forged").expect_err("forged");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
