//! Identity resolution middleware.
//!
//! Resolves the `Authorization` header once per request through an
//! [`IdentityResolver`] and stores the resulting [`Identity`] in the request
//! extensions, where the `Identity` extractor picks it up. A header that is
//! present but unusable short-circuits with `401` before any handler runs.
//! Every response gains `Vary: Authorization`.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderValue, VARY};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::IdentityResolver;
use crate::domain::{Error as DomainError, Identity, IdentityRejection};

/// Middleware factory holding the resolver shared by all workers.
///
/// # Examples
/// ```ignore
/// use actix_web::App;
/// use workout_backend::middleware::ResolveIdentity;
///
/// let app = App::new().wrap(ResolveIdentity::new(resolver));
/// ```
#[derive(Clone)]
pub struct ResolveIdentity {
    resolver: Arc<dyn IdentityResolver>,
}

impl ResolveIdentity {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ResolveIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ResolveIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResolveIdentityMiddleware {
            service: Rc::new(service),
            resolver: Arc::clone(&self.resolver),
        }))
    }
}

/// Service wrapper produced by [`ResolveIdentity`].
pub struct ResolveIdentityMiddleware<S> {
    service: Rc<S>,
    resolver: Arc<dyn IdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for ResolveIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let resolver = Arc::clone(&self.resolver);
        Box::pin(async move {
            let outcome = resolve_header(resolver.as_ref(), &req).await;
            let mut res = match outcome {
                Ok(identity) => {
                    debug!(
                        user_id = ?identity.user().map(|user| user.id),
                        "resolved request identity"
                    );
                    req.extensions_mut().insert(identity);
                    service.call(req).await?.map_into_left_body()
                }
                Err(rejection) => {
                    let response = DomainError::from(rejection).error_response();
                    req.into_response(response).map_into_right_body()
                }
            };
            res.headers_mut()
                .append(VARY, HeaderValue::from_static("Authorization"));
            Ok(res)
        })
    }
}

async fn resolve_header(
    resolver: &dyn IdentityResolver,
    req: &ServiceRequest,
) -> Result<Identity, IdentityRejection> {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(text) => Some(text.to_owned()),
            Err(error) => {
                debug!(%error, "authorization header is not visible ASCII");
                return Err(IdentityRejection::MalformedHeader);
            }
        },
    };
    resolver.resolve(header.as_deref()).await
}
