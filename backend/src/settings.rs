//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `WORKOUT_*` environment variables and
//! configuration files. Everything except the database URL has a default.

use std::net::{Ipv4Addr, SocketAddr};

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_TOKEN_TTL_HOURS, OwnershipDisclosure, PasswordHashingCost};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_PORT: u16 = 8080;

/// Longest accepted token lifetime: 366 days.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Problems with loaded settings that OrthoConfig cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database URL is required (set WORKOUT_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("token lifetime must be between 1 and {max} hours, got {hours}", max = MAX_TOKEN_TTL_HOURS)]
    InvalidTokenTtl { hours: i64 },
    #[error("invalid password hashing cost: {message}")]
    InvalidHashingCost { message: String },
}

/// Runtime configuration for the workout server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKOUT")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Listener address.
    pub bind_addr: Option<SocketAddr>,
    /// Lifetime of issued authentication tokens, in hours.
    pub token_ttl_hours: Option<i64>,
    /// Argon2 memory cost in KiB.
    pub password_memory_kib: Option<u32>,
    /// Argon2 pass count.
    pub password_iterations: Option<u32>,
    /// Argon2 lane count.
    pub password_parallelism: Option<u32>,
    /// Answer non-owners with 404 instead of 403.
    #[ortho_config(default = false)]
    pub conceal_resource_existence: bool,
    /// Apply embedded migrations at startup.
    pub run_migrations: Option<bool>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Return the configured database URL.
    ///
    /// # Errors
    /// [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Token lifetime, defaulting to a day.
    ///
    /// # Errors
    /// [`SettingsError::InvalidTokenTtl`] for values outside
    /// `1..=MAX_TOKEN_TTL_HOURS`.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
            return Err(SettingsError::InvalidTokenTtl { hours });
        }
        Duration::try_hours(hours).ok_or(SettingsError::InvalidTokenTtl { hours })
    }

    /// Argon2 cost, with unset fields taken from the recommended defaults.
    ///
    /// # Errors
    /// [`SettingsError::InvalidHashingCost`] when Argon2 rejects the
    /// combination, e.g. too little memory for the lane count.
    pub fn hashing_cost(&self) -> Result<PasswordHashingCost, SettingsError> {
        let defaults = PasswordHashingCost::default();
        let cost = PasswordHashingCost {
            memory_kib: self.password_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.password_iterations.unwrap_or(defaults.iterations),
            parallelism: self.password_parallelism.unwrap_or(defaults.parallelism),
        };
        cost.validate()
            .map_err(|err| SettingsError::InvalidHashingCost {
                message: err.to_string(),
            })?;
        Ok(cost)
    }

    pub fn disclosure(&self) -> OwnershipDisclosure {
        if self.conceal_resource_existence {
            OwnershipDisclosure::ConcealExistence
        } else {
            OwnershipDisclosure::RevealExistence
        }
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Pool configuration for the database URL.
    ///
    /// # Errors
    /// [`SettingsError::MissingDatabaseUrl`] when no URL is configured.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }
}
