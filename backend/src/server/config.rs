//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::Duration;
use workout_backend::domain::{OwnershipDisclosure, PasswordCredential, PasswordHashingCost};
use workout_backend::outbound::persistence::DbPool;
use workout_backend::settings::{AppSettings, SettingsError};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) token_ttl: Duration,
    pub(crate) hashing_cost: PasswordHashingCost,
    pub(crate) login_decoy: PasswordCredential,
    pub(crate) disclosure: OwnershipDisclosure,
}

impl ServerConfig {
    /// Construct a configuration from loaded settings and an open pool.
    ///
    /// # Errors
    /// Propagates [`SettingsError`] for an invalid token lifetime or an
    /// Argon2 cost that cannot hash.
    pub fn from_settings(settings: &AppSettings, db_pool: DbPool) -> Result<Self, SettingsError> {
        let hashing_cost = settings.hashing_cost()?;
        let login_decoy = PasswordCredential::decoy(&hashing_cost).map_err(|err| {
            SettingsError::InvalidHashingCost {
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            bind_addr: settings.bind_addr(),
            db_pool,
            token_ttl: settings.token_ttl()?,
            hashing_cost,
            login_decoy,
            disclosure: settings.disclosure(),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
