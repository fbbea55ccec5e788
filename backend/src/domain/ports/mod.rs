//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories) are implemented by outbound adapters; driving
//! ports (use-cases) are implemented by domain services and called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod login_service;
mod token_repository;
mod user_accounts_command;
mod user_repository;
mod workout_repository;
mod workouts_command;
mod workouts_query;

pub use identity_resolver::IdentityResolver;
pub use login_service::LoginService;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenRepository, TokenRepositoryError};
pub use user_accounts_command::UserAccountsCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use workout_repository::MockWorkoutRepository;
pub use workout_repository::{WorkoutRepository, WorkoutRepositoryError};
pub use workouts_command::WorkoutsCommand;
pub use workouts_query::WorkoutsQuery;
