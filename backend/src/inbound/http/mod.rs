//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tokens;
pub mod users;
pub mod workouts;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{Scope, web};

use crate::domain::ports::IdentityResolver;
use crate::middleware::ResolveIdentity;

pub use error::ApiResult;
pub use identity::Authenticated;
pub use state::HttpState;

/// Base path of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(tokens::create_token)
        .service(tokens::revoke_tokens)
        .service(workouts::list_workouts)
        .service(workouts::create_workout)
        .service(workouts::get_workout)
        .service(workouts::update_workout)
        .service(workouts::delete_workout);
}

/// The `/api/v1` scope with identity resolution applied to every route.
///
/// `HttpState` must be registered as app data by the caller.
pub fn api_scope(
    resolver: Arc<dyn IdentityResolver>,
) -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope(API_PREFIX)
        .configure(configure_api)
        .wrap(ResolveIdentity::new(resolver))
}
