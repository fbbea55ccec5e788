//! Wire PostgreSQL-backed services into the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use workout_backend::domain::{
    AuthorizationGuard, TokenIdentityResolver, TokenLoginService, UserAccountsService,
    WorkoutsService,
};
use workout_backend::inbound::http::state::HttpState;
use workout_backend::outbound::persistence::{
    DieselTokenRepository, DieselUserRepository, DieselWorkoutRepository,
};

use super::ServerConfig;

/// Build the handler state over Diesel repositories sharing one pool.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let pool = &config.db_pool;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let tokens = Arc::new(DieselTokenRepository::new(pool.clone()));
    let workouts = Arc::new(DieselWorkoutRepository::new(pool.clone()));
    let clock = Arc::new(DefaultClock);

    let identity = TokenIdentityResolver::new(tokens.clone(), users.clone(), clock.clone());
    let login = TokenLoginService::new(users.clone(), tokens, clock.clone())
        .with_token_ttl(config.token_ttl)
        .with_decoy_credential(config.login_decoy.clone());
    let accounts = UserAccountsService::new(users, clock.clone(), config.hashing_cost);
    let workouts = WorkoutsService::new(workouts, clock, AuthorizationGuard::new(config.disclosure));

    HttpState::new(
        Arc::new(identity),
        Arc::new(login),
        Arc::new(accounts),
        Arc::new(workouts),
    )
}
