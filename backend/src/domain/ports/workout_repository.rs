//! Port for workout persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{UserId, Workout, WorkoutDetails, WorkoutId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by workout repository adapters.
    pub enum WorkoutRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "workout repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "workout repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Insert a workout and its entries for `owner`.
    async fn create(
        &self,
        owner: UserId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Workout, WorkoutRepositoryError>;

    /// Fetch a workout with its entries ordered by `order_index`.
    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutRepositoryError>;

    /// Owner of a workout, without loading its entries.
    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutRepositoryError>;

    /// All workouts of `owner`, newest first.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Workout>, WorkoutRepositoryError>;

    /// Replace a workout's fields and entries in one transaction.
    async fn update(
        &self,
        id: WorkoutId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<Workout>, WorkoutRepositoryError>;

    /// Delete a workout and its entries; `false` when nothing was deleted.
    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutRepositoryError>;
}
