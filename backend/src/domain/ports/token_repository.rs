//! Port for bearer token persistence.
//!
//! Only [`TokenRecord`]s cross this boundary: a token's plaintext is never
//! handed to storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenHash, TokenRecord, TokenScope, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum TokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a newly issued token.
    async fn insert(&self, token: &TokenRecord) -> Result<(), TokenRepositoryError>;

    /// Find the token with this hash and scope whose expiry is after `now`.
    async fn find_by_hash_scope_not_expired(
        &self,
        hash: &TokenHash,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<TokenRecord>, TokenRepositoryError>;

    /// Delete every token of `user_id` in `scope`, returning how many went.
    async fn delete_all_for_user(
        &self,
        user_id: UserId,
        scope: TokenScope,
    ) -> Result<u64, TokenRepositoryError>;
}
