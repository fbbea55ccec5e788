//! Authentication token handlers.
//!
//! ```text
//! POST   /api/v1/tokens/authentication {"username":"alice","password":"s3cret"}
//! DELETE /api/v1/tokens/authentication
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, IssuedToken, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;

/// Login body for `POST /api/v1/tokens/authentication`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Envelope around a freshly issued token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub auth_token: IssuedToken,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Exchange a username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/authentication",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Token issued", body = AuthTokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tokens"],
    operation_id = "createAuthenticationToken",
    security([])
)]
#[post("/tokens/authentication")]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let issued = state.login.issue_token(credentials).await?;
    Ok(HttpResponse::Created().json(AuthTokenResponse {
        auth_token: issued,
    }))
}

/// Revoke every authentication token of the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/tokens/authentication",
    responses(
        (status = 204, description = "Tokens revoked"),
        (status = 401, description = "Missing, malformed or expired token", body = Error)
    ),
    tags = ["tokens"],
    operation_id = "revokeAuthenticationTokens"
)]
#[delete("/tokens/authentication")]
pub async fn revoke_tokens(
    state: web::Data<HttpState>,
    user: Authenticated,
) -> ApiResult<HttpResponse> {
    state.login.revoke_tokens(&user).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "tokens_tests.rs"]
mod tests;
