//! Workout handlers.
//!
//! Every route needs an authenticated caller; single-workout routes are
//! further gated by ownership inside the workouts service.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, Workout, WorkoutDraft, WorkoutId, WorkoutPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;

/// List the caller's workouts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/workouts",
    responses(
        (status = 200, description = "Caller's workouts", body = [Workout]),
        (status = 401, description = "Missing, malformed or expired token", body = Error)
    ),
    tags = ["workouts"],
    operation_id = "listWorkouts"
)]
#[get("/workouts")]
pub async fn list_workouts(
    state: web::Data<HttpState>,
    user: Authenticated,
) -> ApiResult<web::Json<Vec<Workout>>> {
    Ok(web::Json(state.workouts_query.list(&user).await?))
}

/// Create a workout owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/workouts",
    request_body = WorkoutDraft,
    responses(
        (status = 201, description = "Workout created", body = Workout),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing, malformed or expired token", body = Error)
    ),
    tags = ["workouts"],
    operation_id = "createWorkout"
)]
#[post("/workouts")]
pub async fn create_workout(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<WorkoutDraft>,
) -> ApiResult<HttpResponse> {
    let workout = state.workouts.create(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(workout))
}

/// Fetch one of the caller's workouts.
#[utoipa::path(
    get,
    path = "/api/v1/workouts/{id}",
    params(("id" = i64, Path, description = "Workout identifier")),
    responses(
        (status = 200, description = "Workout", body = Workout),
        (status = 401, description = "Missing, malformed or expired token", body = Error),
        (status = 403, description = "Workout belongs to another user", body = Error),
        (status = 404, description = "Workout does not exist", body = Error)
    ),
    tags = ["workouts"],
    operation_id = "getWorkout"
)]
#[get("/workouts/{id}")]
pub async fn get_workout(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Workout>> {
    let id = WorkoutId::new(path.into_inner());
    Ok(web::Json(state.workouts_query.get(&user, id).await?))
}

/// Partially update a workout; `entries`, when sent, replaces the list.
#[utoipa::path(
    put,
    path = "/api/v1/workouts/{id}",
    params(("id" = i64, Path, description = "Workout identifier")),
    request_body = WorkoutPatch,
    responses(
        (status = 200, description = "Updated workout", body = Workout),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing, malformed or expired token", body = Error),
        (status = 403, description = "Workout belongs to another user", body = Error),
        (status = 404, description = "Workout does not exist", body = Error)
    ),
    tags = ["workouts"],
    operation_id = "updateWorkout"
)]
#[put("/workouts/{id}")]
pub async fn update_workout(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<WorkoutPatch>,
) -> ApiResult<web::Json<Workout>> {
    let id = WorkoutId::new(path.into_inner());
    let updated = state
        .workouts
        .update(&user, id, payload.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Delete a workout.
#[utoipa::path(
    delete,
    path = "/api/v1/workouts/{id}",
    params(("id" = i64, Path, description = "Workout identifier")),
    responses(
        (status = 204, description = "Workout deleted"),
        (status = 401, description = "Missing, malformed or expired token", body = Error),
        (status = 403, description = "Workout belongs to another user", body = Error),
        (status = 404, description = "Workout does not exist", body = Error)
    ),
    tags = ["workouts"],
    operation_id = "deleteWorkout"
)]
#[delete("/workouts/{id}")]
pub async fn delete_workout(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .workouts
        .delete(&user, WorkoutId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "workouts_tests.rs"]
mod tests;
