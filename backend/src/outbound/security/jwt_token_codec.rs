//! HS256 JSON Web Token implementation of the token codec port.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{Identity, TokenClaims, UserId};

/// Registered and private claims carried in the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,
    username: String,
    iat: i64,
    exp: i64,
}

/// Token codec signing with a shared HMAC secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Build a codec from raw secret bytes.
    pub fn from_secret(secret: &Zeroizing<Vec<u8>>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

fn from_timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenCodecError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenCodecError::malformed(format!("timestamp {seconds} out of range")))
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError> {
        let payload = JwtClaims {
            sub: *claims.identity.user_id.as_uuid(),
            username: claims.identity.username.clone(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|err| TokenCodecError::encoding(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature => TokenCodecError::invalid_signature(),
                _ => TokenCodecError::malformed(err.to_string()),
            }
        })?;
        let claims = data.claims;
        Ok(TokenClaims {
            identity: Identity {
                user_id: UserId::from_uuid(claims.sub),
                username: claims.username,
            },
            issued_at: from_timestamp(claims.iat)?,
            expires_at: from_timestamp(claims.exp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn codec() -> JwtTokenCodec {
        JwtTokenCodec::from_secret(&Zeroizing::new(b"0123456789abcdef0123456789abcdef".to_vec()))
    }

    fn claims() -> TokenClaims {
        let issued_at = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        TokenClaims {
            identity: Identity {
                user_id: UserId::random(),
                username: "Ada".to_owned(),
            },
            issued_at,
            expires_at: issued_at + Duration::hours(1),
        }
    }

    #[rstest]
    fn decode_recovers_claims_even_when_expired(codec: JwtTokenCodec) {
        let original = claims();
        let token = codec.encode(&original).expect("encoded");
        let decoded = codec.decode(&token).expect("decoded");
        assert_eq!(decoded, original);
    }

    #[rstest]
    fn foreign_signature_is_rejected(codec: JwtTokenCodec) {
        let other = JwtTokenCodec::from_secret(&Zeroizing::new(vec![7_u8; 32]));
        let token = other.encode(&claims()).expect("encoded");
        let err = codec.decode(&token).expect_err("wrong key");
        assert_eq!(err, TokenCodecError::InvalidSignature);
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    #[case("a.b")]
    fn garbage_is_malformed(codec: JwtTokenCodec, #[case] token: &str) {
        let err = codec.decode(token).expect_err("garbage");
        assert!(matches!(err, TokenCodecError::Malformed { .. }));
    }
}
