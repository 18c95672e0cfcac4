//! Driving ports for account registration, login and bearer verification.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, Identity, LoginCredentials, Registration};

/// Use-case port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign the caller in.
    ///
    /// Fails with `conflict` when the email is already registered.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Verify credentials and issue a fresh token.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `unauthorized`.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;
}

/// Gate every mutating endpoint passes through.
#[cfg_attr(test, mockall::automock)]
pub trait AuthenticationGate: Send + Sync {
    /// Resolve a bearer token to the caller's identity or fail with
    /// `unauthorized`.
    fn authenticate(&self, token: &str) -> Result<Identity, Error>;
}
