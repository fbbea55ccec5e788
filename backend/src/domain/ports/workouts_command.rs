//! Driving port for workout mutations.
//!
//! Every operation on an existing workout runs through the ownership guard.

use async_trait::async_trait;

use crate::domain::{Error, User, Workout, WorkoutDraft, WorkoutId, WorkoutPatch};

#[async_trait]
pub trait WorkoutsCommand: Send + Sync {
    /// Create a workout owned by `user`.
    async fn create(&self, user: &User, draft: WorkoutDraft) -> Result<Workout, Error>;

    /// Apply a partial update to a workout `user` owns.
    async fn update(&self, user: &User, id: WorkoutId, patch: WorkoutPatch)
    -> Result<Workout, Error>;

    /// Delete a workout `user` owns.
    async fn delete(&self, user: &User, id: WorkoutId) -> Result<(), Error>;
}
