//! User account handlers.
//!
//! ```text
//! POST /api/v1/users {"username":"alice","email":"alice@example.com","password":"s3cret"}
//! GET  /api/v1/users/me
//! PUT  /api/v1/users/me {"username":"alice","bio":"runs on weekends"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, ProfileUpdate, Registration, User, UserValidationError, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[serde(default)]
    pub bio: String,
}

/// Profile body for `PUT /api/v1/users/me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    pub bio: String,
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
        bio,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&username, &email, &password, &bio)
        .map_err(map_user_validation_error)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Return the caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing, malformed or expired token", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(user: Authenticated) -> web::Json<User> {
    web::Json(user.into_inner())
}

/// Change the caller's username and bio.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing, malformed or expired token", body = Error),
        (status = 409, description = "Username already taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[put("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let UpdateProfileRequest { username, bio } = payload.into_inner();
    let update = ProfileUpdate {
        username: Username::new(username).map_err(map_user_validation_error)?,
        bio,
    };
    let updated = state.accounts.update_profile(&user, update).await?;
    Ok(web::Json(updated))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
