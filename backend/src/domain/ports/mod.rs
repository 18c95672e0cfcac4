//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters. Driving ports ([`BusinessCommand`],
//! [`ReviewCommand`], [`AccountCommand`] and friends) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod business_directory;
mod business_repository;
mod password_hasher;
mod review_ingestion;
mod review_repository;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use accounts::{MockAccountCommand, MockAuthenticationGate};
pub use accounts::{AccountCommand, AuthenticationGate};
#[cfg(test)]
pub use business_directory::{MockBusinessCommand, MockBusinessQuery};
pub use business_directory::{BusinessCommand, BusinessQuery};
#[cfg(test)]
pub use business_repository::MockBusinessRepository;
pub use business_repository::{BusinessRepository, BusinessRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use review_ingestion::{MockRatingReconciler, MockReviewCommand, MockReviewQuery};
pub use review_ingestion::{RatingReconciler, ReconcileReport, ReviewCommand, ReviewQuery};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
