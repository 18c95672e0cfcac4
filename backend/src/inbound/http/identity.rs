//! Bearer token extraction for authenticated endpoints.
//!
//! Tokens are accepted from `Authorization: Bearer <token>` or, for older
//! clients, the `x-auth-token` header. The bearer header wins when both are
//! present.

use std::future::{Ready, ready};

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

/// Legacy token header.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Extractor resolving the caller's [`Identity`] or failing with
/// `unauthorized`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

fn legacy_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTH_TOKEN_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Identity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let headers = req.headers();
    let token = bearer_token(headers)
        .or_else(|| legacy_token(headers))
        .ok_or_else(|| Error::unauthorized("authentication required"))?;
    state.authentication.authenticate(token)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(Self))
    }
}
