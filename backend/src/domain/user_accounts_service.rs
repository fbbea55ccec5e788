//! Account registration and profile updates.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::domain::ports::{UserAccountsCommand, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, NewUser, PasswordCredential, PasswordHashingCost, ProfileUpdate, Registration, TraceId,
    User,
};

/// Map user store failures onto domain errors, logging infrastructure faults.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { .. } => {
            error!(error = %error, "user repository unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        UserPersistenceError::Query { .. } => {
            error!(error = %error, "user repository query failed");
            Error::internal_cause(&error)
        }
        UserPersistenceError::Conflict { ref field } => {
            Error::conflict(error.to_string()).with_details(json!({ "field": field }))
        }
    }
}

/// [`UserAccountsCommand`] backed by the user repository.
#[derive(Clone)]
pub struct UserAccountsService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    hashing_cost: PasswordHashingCost,
}

impl<U> UserAccountsService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>, hashing_cost: PasswordHashingCost) -> Self {
        Self {
            users,
            clock,
            hashing_cost,
        }
    }
}

#[async_trait]
impl<U> UserAccountsCommand for UserAccountsService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let cost = self.hashing_cost;
        let credential = TraceId::spawn_blocking(move || PasswordCredential::set(&password, &cost))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                Error::internal("password hashing task failed")
            })?
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal_cause(err)
            })?;

        let new_user = NewUser {
            username: registration.username().clone(),
            email: registration.email().clone(),
            bio: registration.bio().to_owned(),
            credential,
        };
        let user = self
            .users
            .create(&new_user, self.clock.utc())
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    async fn update_profile(&self, user: &User, update: ProfileUpdate) -> Result<User, Error> {
        self.users
            .update_profile(user.id, &update, self.clock.utc())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user does not exist"))
    }
}

#[cfg(test)]
#[path = "user_accounts_service_tests.rs"]
mod tests;
