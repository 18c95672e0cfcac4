//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod businesses;
pub mod error;
pub mod health;
pub mod identity;
pub mod reviews;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every `/api` route with JSON body errors mapped to `malformed_body`.
///
/// `/businesses/featured` is registered ahead of `/businesses/{id}` so the
/// literal segment is never parsed as an id.
pub fn api_scope() -> Scope {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| validation::malformed_body_error(err).into());
    web::scope("/api")
        .app_data(json)
        .service(accounts::register)
        .service(accounts::login)
        .service(businesses::featured_businesses)
        .service(businesses::search_businesses)
        .service(businesses::create_business)
        .service(businesses::reconcile_business)
        .service(businesses::get_business)
        .service(reviews::submit_review)
        .service(reviews::list_reviews)
}
