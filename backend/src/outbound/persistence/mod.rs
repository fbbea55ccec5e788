//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Validation happens in domain constructors.
//! - **Internal models**: row structs (`models.rs`) and `table!`
//!   definitions (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: driver errors map to the port error enums;
//!   unique violations on `users` become `Conflict { field }`.
//!
//! # Example
//!
//! ```ignore
//! use workout_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/workouts")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_token_repository;
mod diesel_user_repository;
mod diesel_workout_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_token_repository::DieselTokenRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_workout_repository::DieselWorkoutRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
