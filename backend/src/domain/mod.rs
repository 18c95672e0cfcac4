//! Domain primitives, ports and services.
//!
//! Purpose: Define the strongly typed entities of the business directory and
//! the services that operate on them. Nothing in this module knows about
//! HTTP or SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - Business, Review, RatingSummary — directory entities and aggregates.
//! - ReviewIngestionService — review intake with serialised aggregate refresh.
//! - BusinessDirectoryService, AccountService, TokenAuthenticationGate.

pub mod account_service;
pub mod auth;
pub mod authentication_service;
pub mod business;
pub mod business_directory_service;
pub mod business_locks;
pub mod error;
pub mod ports;
pub mod rating;
pub mod review;
pub mod review_ingestion_service;
pub mod search;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthSession, CredentialsValidationError, Identity, LoginCredentials, PASSWORD_MAX,
    PASSWORD_MIN, PasswordHash, Registration, StoredCredentials, TokenClaims,
};
pub use self::authentication_service::TokenAuthenticationGate;
pub use self::business::{
    Business, BusinessDraft, BusinessId, BusinessValidationError, LISTING_FIELD_MAX, PriceRange,
};
pub use self::business_directory_service::BusinessDirectoryService;
pub use self::business_locks::{BusinessLockGuard, BusinessLocks};
pub use self::error::{Error, ErrorCode, ErrorDto, ErrorValidationError, TRACE_ID_HEADER};
pub use self::rating::{
    AverageRating, RATING_MAX, RATING_MIN, Rating, RatingSummary, RatingValidationError,
};
pub use self::review::{
    COMMENT_MAX, Review, ReviewComment, ReviewId, ReviewSubmission, ReviewValidationError,
};
pub use self::review_ingestion_service::ReviewIngestionService;
pub use self::search::{FEATURED_LIMIT, SearchQuery};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, USERNAME_MAX, USERNAME_MIN, User, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pulse_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
