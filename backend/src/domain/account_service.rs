//! Account registration, login and token issuance.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, PasswordHashError, PasswordHasher, TokenCodec, TokenCodecError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthSession, Error, Identity, LoginCredentials, Registration, StoredCredentials, TokenClaims,
    User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl<U, H, T> AccountService<U, H, T> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            token_ttl,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_codec_error(error: TokenCodecError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    fn issue(&self, user: User) -> Result<AuthSession, Error> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.token_ttl;
        let claims = TokenClaims {
            identity: Identity::from(&user),
            issued_at,
            expires_at,
        };
        let token = self.tokens.encode(&claims).map_err(map_codec_error)?;
        Ok(AuthSession {
            token,
            expires_at,
            user,
        })
    }
}

#[async_trait]
impl<U, H, T> AccountCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = User {
            id: UserId::random(),
            username: registration.username().clone(),
            email: registration.email().clone(),
        };
        self.users
            .insert(&StoredCredentials {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "account registered");
        self.issue(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            debug!(user_id = %stored.user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.issue(stored.user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
