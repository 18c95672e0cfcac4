//! Port for signing and decoding bearer tokens.
//!
//! The codec checks signatures and structure only. Expiry is judged by the
//! domain against its own clock.

use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codec adapters.
    pub enum TokenCodecError {
        /// The token is not structurally valid.
        Malformed { message: String } => "token is malformed: {message}",
        /// The signature does not match.
        InvalidSignature => "token signature is invalid",
        /// Signing a new token failed.
        Encoding { message: String } => "token encoding failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into an opaque bearer token.
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError>;

    /// Verify a bearer token's signature and recover its claims.
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError>;
}
