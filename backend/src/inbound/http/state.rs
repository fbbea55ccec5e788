//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IdentityResolver, LoginService, UserAccountsCommand, WorkoutsCommand, WorkoutsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityResolver>,
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccountsCommand>,
    pub workouts: Arc<dyn WorkoutsCommand>,
    pub workouts_query: Arc<dyn WorkoutsQuery>,
}

impl HttpState {
    /// Build state from a single service implementing both workout ports.
    pub fn new<W>(
        identity: Arc<dyn IdentityResolver>,
        login: Arc<dyn LoginService>,
        accounts: Arc<dyn UserAccountsCommand>,
        workouts: Arc<W>,
    ) -> Self
    where
        W: WorkoutsCommand + WorkoutsQuery + 'static,
    {
        Self {
            identity,
            login,
            accounts,
            workouts: workouts.clone(),
            workouts_query: workouts,
        }
    }
}
