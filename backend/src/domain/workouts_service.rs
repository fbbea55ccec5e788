//! Workout use-cases guarded by ownership.
//!
//! Reads, updates and deletes of a single workout all consult the
//! [`AuthorizationGuard`] before touching the record, so non-owners are
//! turned away before their payload is even validated.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    WorkoutRepository, WorkoutRepositoryError, WorkoutsCommand, WorkoutsQuery,
};
use crate::domain::{
    AuthorizationGuard, Error, User, Workout, WorkoutDetails, WorkoutDraft, WorkoutId,
    WorkoutPatch, WorkoutValidationError,
};

const RESOURCE: &str = "workout";

fn map_repository_error(error: WorkoutRepositoryError) -> Error {
    error!(error = %error, "workout repository failure");
    match error {
        WorkoutRepositoryError::Connection { .. } => {
            Error::service_unavailable("workout store is unavailable")
        }
        WorkoutRepositoryError::Query { .. } => Error::internal_cause(&error),
    }
}

fn map_validation_error(error: WorkoutValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn missing() -> Error {
    Error::not_found(format!("{RESOURCE} does not exist"))
}

/// Workout service implementing both command and query driving ports.
#[derive(Clone)]
pub struct WorkoutsService<W> {
    workouts: Arc<W>,
    clock: Arc<dyn Clock>,
    guard: AuthorizationGuard,
}

impl<W> WorkoutsService<W> {
    pub fn new(workouts: Arc<W>, clock: Arc<dyn Clock>, guard: AuthorizationGuard) -> Self {
        Self {
            workouts,
            clock,
            guard,
        }
    }
}

impl<W> WorkoutsService<W>
where
    W: WorkoutRepository,
{
    async fn ensure_owner(&self, user: &User, id: WorkoutId) -> Result<(), Error> {
        let owner = self
            .workouts
            .find_owner(id)
            .await
            .map_err(map_repository_error)?;
        self.guard.authorize(user, owner).into_result(RESOURCE)
    }
}

#[async_trait]
impl<W> WorkoutsCommand for WorkoutsService<W>
where
    W: WorkoutRepository,
{
    async fn create(&self, user: &User, draft: WorkoutDraft) -> Result<Workout, Error> {
        let details = WorkoutDetails::try_new(draft).map_err(map_validation_error)?;
        let workout = self
            .workouts
            .create(user.id, &details, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, workout_id = %workout.id, "created workout");
        Ok(workout)
    }

    async fn update(
        &self,
        user: &User,
        id: WorkoutId,
        patch: WorkoutPatch,
    ) -> Result<Workout, Error> {
        self.ensure_owner(user, id).await?;
        let existing = self
            .workouts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(missing)?;
        let details = existing
            .details
            .patched(patch)
            .map_err(map_validation_error)?;
        self.workouts
            .update(id, &details, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(missing)
    }

    async fn delete(&self, user: &User, id: WorkoutId) -> Result<(), Error> {
        self.ensure_owner(user, id).await?;
        let deleted = self
            .workouts
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(missing());
        }
        info!(user_id = %user.id, workout_id = %id, "deleted workout");
        Ok(())
    }
}

#[async_trait]
impl<W> WorkoutsQuery for WorkoutsService<W>
where
    W: WorkoutRepository,
{
    async fn list(&self, user: &User) -> Result<Vec<Workout>, Error> {
        self.workouts
            .list_for_owner(user.id)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, user: &User, id: WorkoutId) -> Result<Workout, Error> {
        let workout = self
            .workouts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        self.guard
            .authorize(user, workout.as_ref().map(|found| found.user_id))
            .into_result(RESOURCE)?;
        workout.ok_or_else(missing)
    }
}

#[cfg(test)]
#[path = "workouts_service_tests.rs"]
mod tests;
