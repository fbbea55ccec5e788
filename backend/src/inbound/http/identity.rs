//! Identity extractors.
//!
//! [`Identity`] is read from the request extensions populated by
//! [`crate::middleware::ResolveIdentity`]. When a route is mounted without
//! that middleware the extractor resolves the header itself through
//! [`HttpState`], so a handler can never observe a missing identity.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, ready};
use tracing::error;

use crate::domain::{Error, Identity, IdentityRejection, User, require_authenticated};
use crate::inbound::http::state::HttpState;

impl FromRequest for Identity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cached = req.extensions().get::<Identity>().cloned();
        if let Some(identity) = cached {
            return Box::pin(ready(Ok(identity)));
        }

        let req = req.clone();
        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<HttpState>>().cloned() else {
                error!("identity requested but HttpState is not registered");
                return Err(Error::internal("identity resolver is not configured"));
            };
            let header = match req.headers().get(AUTHORIZATION) {
                None => None,
                Some(value) => Some(
                    value
                        .to_str()
                        .map_err(|_| IdentityRejection::MalformedHeader)?
                        .to_owned(),
                ),
            };
            let identity = state.identity.resolve(header.as_deref()).await?;
            req.extensions_mut().insert(identity.clone());
            Ok(identity)
        })
    }
}

/// Extractor for routes that require a logged-in caller.
///
/// Anonymous requests fail with `401 you must be logged in to access this
/// route`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl Authenticated {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for Authenticated {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload);
        Box::pin(async move {
            let user = require_authenticated(identity.await?)?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::sync::Arc;

    use crate::inbound::http::test_utils::{StubResolver, state_with_resolver};
    use crate::domain::{Email, UserId, Username};

    fn alice() -> User {
        let at = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        User {
            id: UserId::new(1),
            username: Username::new("alice").expect("valid"),
            email: Email::new("alice@example.com").expect("valid"),
            bio: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    async fn whoami(user: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(user.username.as_ref().to_owned())
    }

    async fn anyone(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(if identity.is_anonymous() { "anonymous" } else { "user" })
    }

    #[rstest]
    #[case(None, "/anyone", StatusCode::OK)]
    #[case(None, "/whoami", StatusCode::UNAUTHORIZED)]
    #[case(Some("Bearer alice"), "/whoami", StatusCode::OK)]
    #[case(Some("Bearer nope"), "/anyone", StatusCode::UNAUTHORIZED)]
    #[case(Some("Token alice"), "/anyone", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn extractors_resolve_without_middleware(
        #[case] header: Option<&str>,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let resolver = StubResolver::new().with_token("alice", alice());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_resolver(Arc::new(resolver))))
                .route("/anyone", web::get().to(anyone))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri(path);
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }

        let res = test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn anonymous_caller_gets_login_message() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_resolver(Arc::new(StubResolver::new()))))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        let body: Error = test::read_body_json(res).await;

        assert_eq!(body.message(), "you must be logged in to access this route");
    }
}
