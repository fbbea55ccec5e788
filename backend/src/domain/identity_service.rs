//! Token-backed identity resolution.
//!
//! Implements the [`IdentityResolver`] driving port: parse the bearer header,
//! hash the presented token, look it up by hash, scope and expiry, then load
//! its owner. Any failure after parsing is reported as
//! [`IdentityRejection::InvalidOrExpiredToken`] so callers cannot tell an
//! unknown token from a storage outage; the outage is logged instead.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{IdentityResolver, TokenRepository, UserRepository};
use crate::domain::{Identity, IdentityRejection, TokenHash, TokenScope, parse_bearer};

/// Resolves identities from authentication-scope bearer tokens.
#[derive(Clone)]
pub struct TokenIdentityResolver<T, U> {
    tokens: Arc<T>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TokenIdentityResolver<T, U> {
    pub fn new(tokens: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<T, U> IdentityResolver for TokenIdentityResolver<T, U>
where
    T: TokenRepository,
    U: UserRepository,
{
    async fn resolve(&self, authorization: Option<&str>) -> Result<Identity, IdentityRejection> {
        let Some(header) = authorization else {
            return Ok(Identity::Anonymous);
        };
        let plaintext = parse_bearer(header).inspect_err(|_| {
            debug!("rejected malformed authorization header");
        })?;

        let hash = TokenHash::of_plaintext(plaintext);
        let now = self.clock.utc();
        let record = match self
            .tokens
            .find_by_hash_scope_not_expired(&hash, TokenScope::Authentication, now)
            .await
        {
            Ok(Some(record)) if record.is_valid_at(now) => record,
            Ok(_) => {
                debug!(token = ?hash, "no live token matches");
                return Err(IdentityRejection::InvalidOrExpiredToken);
            }
            Err(err) => {
                error!(error = %err, "token lookup failed while resolving identity");
                return Err(IdentityRejection::InvalidOrExpiredToken);
            }
        };

        match self.users.find_by_id(record.user_id).await {
            Ok(Some(user)) => Ok(Identity::Authenticated(user)),
            Ok(None) => {
                debug!(user_id = %record.user_id, "token owner no longer exists");
                Err(IdentityRejection::InvalidOrExpiredToken)
            }
            Err(err) => {
                error!(error = %err, user_id = %record.user_id, "user lookup failed while resolving identity");
                Err(IdentityRejection::InvalidOrExpiredToken)
            }
        }
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
