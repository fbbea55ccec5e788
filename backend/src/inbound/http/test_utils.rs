//! Test helpers for inbound HTTP components.

use std::collections::HashMap;
use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::domain::ports::IdentityResolver;
use crate::domain::{Identity, IdentityRejection, OwnershipDisclosure, User, parse_bearer};
use crate::inbound::http::state::HttpState;
use crate::test_support::InMemoryBackend;

/// Fixed instant tests start from.
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Resolver mapping literal bearer tokens to users, with no storage.
#[derive(Default)]
pub struct StubResolver {
    users: HashMap<String, User>,
}

impl StubResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user: User) -> Self {
        self.users.insert(token.to_owned(), user);
        self
    }
}

#[async_trait]
impl IdentityResolver for StubResolver {
    async fn resolve(&self, authorization: Option<&str>) -> Result<Identity, IdentityRejection> {
        let Some(header) = authorization else {
            return Ok(Identity::Anonymous);
        };
        let token = parse_bearer(header)?;
        self.users
            .get(token)
            .cloned()
            .map(Identity::Authenticated)
            .ok_or(IdentityRejection::InvalidOrExpiredToken)
    }
}

/// In-memory state whose identity resolution is replaced by `resolver`.
pub fn state_with_resolver(resolver: Arc<dyn IdentityResolver>) -> HttpState {
    let mut state = InMemoryBackend::new(test_epoch()).default_state(OwnershipDisclosure::default());
    state.identity = resolver;
    state
}

/// Register `username` with a derived email and return the response body.
pub async fn register<S>(app: &S, username: &str, password: &str) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "registration of {username}");
    test::read_body_json(res).await
}

/// Log in and return the bearer header value.
pub async fn bearer_for<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/authentication")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "login of {username}");
    let body: serde_json::Value = test::read_body_json(res).await;
    let token = body
        .pointer("/authToken/token")
        .and_then(serde_json::Value::as_str)
        .expect("token in body");
    format!("Bearer {token}")
}
