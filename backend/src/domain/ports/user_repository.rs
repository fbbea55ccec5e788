//! Port for user persistence.
//!
//! Adapters report uniqueness violations as [`UserPersistenceError::Conflict`]
//! naming the offending field, so services can answer 409 without parsing
//! driver messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewUser, ProfileUpdate, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        Conflict { field: String } => "{field} is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, stamping both timestamps with `now`.
    async fn create(&self, user: &NewUser, now: DateTime<Utc>)
    -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their credential by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Overwrite username and bio; `None` when the user no longer exists.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;
}
