//! Driving port for issuing and revoking authentication tokens.
//!
//! HTTP handlers call this port without knowing how credentials are checked
//! or where tokens are kept, which keeps handler tests free of persistence.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, User};

#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and mint an authentication token.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn issue_token(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error>;

    /// Delete every authentication token belonging to `user`.
    async fn revoke_tokens(&self, user: &User) -> Result<(), Error>;
}
