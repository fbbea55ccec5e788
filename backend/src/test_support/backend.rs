//! Fully wired in-memory backend for handler and scenario tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Duration, Utc};

use super::{
    InMemoryTokenRepository, InMemoryUserRepository, InMemoryWorkoutRepository, MutableClock,
    cheap_hashing_cost,
};
use crate::Trace;
use crate::domain::{
    AuthorizationGuard, DEFAULT_TOKEN_TTL_HOURS, OwnershipDisclosure, PasswordCredential,
    TokenIdentityResolver, TokenLoginService, UserAccountsService, WorkoutsService,
};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;

/// In-memory repositories sharing one controllable clock.
#[derive(Clone)]
pub struct InMemoryBackend {
    pub users: Arc<InMemoryUserRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
    pub workouts: Arc<InMemoryWorkoutRepository>,
    pub clock: Arc<MutableClock>,
}

impl InMemoryBackend {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            tokens: Arc::new(InMemoryTokenRepository::new()),
            workouts: Arc::new(InMemoryWorkoutRepository::new()),
            clock: Arc::new(MutableClock::new(start)),
        }
    }

    /// State with the default token lifetime.
    pub fn default_state(&self, disclosure: OwnershipDisclosure) -> HttpState {
        self.http_state(disclosure, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Wire the production services over the in-memory stores.
    pub fn http_state(&self, disclosure: OwnershipDisclosure, token_ttl: Duration) -> HttpState {
        let identity = TokenIdentityResolver::new(
            self.tokens.clone(),
            self.users.clone(),
            self.clock.clone(),
        );
        let mut login =
            TokenLoginService::new(self.users.clone(), self.tokens.clone(), self.clock.clone())
                .with_token_ttl(token_ttl);
        if let Ok(decoy) = PasswordCredential::decoy(&cheap_hashing_cost()) {
            login = login.with_decoy_credential(decoy);
        }
        let accounts =
            UserAccountsService::new(self.users.clone(), self.clock.clone(), cheap_hashing_cost());
        let workouts = WorkoutsService::new(
            self.workouts.clone(),
            self.clock.clone(),
            AuthorizationGuard::new(disclosure),
        );
        HttpState::new(
            Arc::new(identity),
            Arc::new(login),
            Arc::new(accounts),
            Arc::new(workouts),
        )
    }
}

/// Actix app exposing `/api/v1` over `state`, wrapped like the production
/// server.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let resolver = state.identity.clone();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api_scope(resolver))
}
