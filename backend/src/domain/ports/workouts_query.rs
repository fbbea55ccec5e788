//! Driving port for workout reads.

use async_trait::async_trait;

use crate::domain::{Error, User, Workout, WorkoutId};

#[async_trait]
pub trait WorkoutsQuery: Send + Sync {
    /// Workouts owned by `user`.
    async fn list(&self, user: &User) -> Result<Vec<Workout>, Error>;

    /// A single workout, subject to the ownership guard.
    async fn get(&self, user: &User, id: WorkoutId) -> Result<Workout, Error>;
}
