//! Password login and token revocation.
//!
//! Issues authentication-scope tokens for valid credentials and bulk-deletes
//! them on logout. Password verification runs on Tokio's blocking pool, and
//! unknown usernames are checked against a decoy hash so both failure paths
//! pay the Argon2 cost.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{LoginService, TokenRepository, TokenRepositoryError, UserRepository};
use crate::domain::user_accounts_service::map_user_persistence_error;
use crate::domain::{
    Error, IssuedToken, LoginCredentials, PasswordCredential, Token, TokenScope, TraceId, User,
};

/// Default lifetime of an authentication token, in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_token_repository_error(error: TokenRepositoryError) -> Error {
    error!(error = %error, "token repository failure");
    match error {
        TokenRepositoryError::Connection { .. } => {
            Error::service_unavailable("token store is unavailable")
        }
        TokenRepositoryError::Query { .. } => Error::internal_cause(&error),
    }
}

/// [`LoginService`] backed by the user and token repositories.
#[derive(Clone)]
pub struct TokenLoginService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
    decoy: Option<PasswordCredential>,
}

impl<U, T> TokenLoginService<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tokens,
            clock,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            decoy: None,
        }
    }

    /// Override the token lifetime.
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Verify unknown usernames against `decoy`, normally built with
    /// [`PasswordCredential::decoy`] at the configured cost.
    pub fn with_decoy_credential(mut self, decoy: PasswordCredential) -> Self {
        self.decoy = Some(decoy);
        self
    }

    async fn verify_decoy(&self, credentials: LoginCredentials) {
        let Some(decoy) = self.decoy.clone() else {
            return;
        };
        let password = credentials.into_password();
        let outcome = TraceId::spawn_blocking(move || decoy.matches(&password)).await;
        if let Ok(Err(err)) = outcome {
            error!(error = %err, "decoy credential is unusable");
        }
    }
}

#[async_trait]
impl<U, T> LoginService for TokenLoginService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    async fn issue_token(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error> {
        let Some(account) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("login attempt for unknown username");
            self.verify_decoy(credentials).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = credentials.into_password();
        let credential = account.credential;
        let matched = TraceId::spawn_blocking(move || credential.matches(&password))
            .await
            .map_err(|err| {
                error!(error = %err, "password verification task failed");
                Error::internal("password verification task failed")
            })?
            .map_err(|err| {
                error!(error = %err, user_id = %account.user.id, "stored credential is unusable");
                Error::internal_cause(err)
            })?;
        if !matched {
            debug!(user_id = %account.user.id, "login attempt with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = Token::generate(
            account.user.id,
            self.token_ttl,
            TokenScope::Authentication,
            self.clock.utc(),
        )
        .map_err(|err| {
            error!(error = %err, "could not mint authentication token");
            Error::internal_cause(err)
        })?;
        self.tokens
            .insert(token.record())
            .await
            .map_err(map_token_repository_error)?;

        info!(user_id = %account.user.id, expiry = %token.record().expiry, "issued authentication token");
        Ok(token.into_issued())
    }

    async fn revoke_tokens(&self, user: &User) -> Result<(), Error> {
        let removed = self
            .tokens
            .delete_all_for_user(user.id, TokenScope::Authentication)
            .await
            .map_err(map_token_repository_error)?;
        info!(user_id = %user.id, removed, "revoked authentication tokens");
        Ok(())
    }
}

#[cfg(test)]
#[path = "login_service_tests.rs"]
mod tests;
