//! Driving port for account registration and profile edits.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, Registration, User};

#[async_trait]
pub trait UserAccountsCommand: Send + Sync {
    /// Hash the password and create the account.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Change the caller's own username and bio.
    async fn update_profile(&self, user: &User, update: ProfileUpdate) -> Result<User, Error>;
}
