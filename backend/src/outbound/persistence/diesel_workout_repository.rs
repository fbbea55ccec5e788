//! PostgreSQL-backed `WorkoutRepository` implementation using Diesel ORM.
//!
//! A workout and its entries are written in one transaction. Updates
//! replace the entry set wholesale, mirroring `WorkoutPatch` semantics.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{WorkoutRepository, WorkoutRepositoryError};
use crate::domain::{
    UserId, Workout, WorkoutDetails, WorkoutDraft, WorkoutEntryDraft, WorkoutId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    NewWorkoutEntryRow, NewWorkoutRow, WorkoutChangeset, WorkoutEntryRow, WorkoutRow,
};
use super::pool::DbPool;
use super::schema::{workout_entries, workouts};

/// Diesel-backed implementation of the workout repository port.
#[derive(Clone)]
pub struct DieselWorkoutRepository {
    pool: DbPool,
}

impl DieselWorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> WorkoutRepositoryError {
    map_diesel_error(
        error,
        WorkoutRepositoryError::query,
        WorkoutRepositoryError::connection,
    )
}

fn entry_rows(workout_id: i64, details: &WorkoutDetails) -> Vec<NewWorkoutEntryRow<'_>> {
    details
        .entries()
        .iter()
        .map(|entry| NewWorkoutEntryRow {
            workout_id,
            exercise_name: entry.exercise_name(),
            sets: entry.sets(),
            reps: entry.reps(),
            duration_seconds: entry.duration_seconds(),
            weight: entry.weight(),
            notes: entry.notes(),
            order_index: entry.order_index(),
        })
        .collect()
}

fn row_to_workout(
    row: WorkoutRow,
    entries: Vec<WorkoutEntryRow>,
) -> Result<Workout, WorkoutRepositoryError> {
    let entries = entries
        .into_iter()
        .map(|entry| WorkoutEntryDraft {
            exercise_name: entry.exercise_name,
            sets: entry.sets,
            reps: entry.reps,
            duration_seconds: entry.duration_seconds,
            weight: entry.weight,
            notes: entry.notes,
            order_index: entry.order_index,
        })
        .collect();
    let details = WorkoutDetails::try_new(WorkoutDraft {
        title: row.title,
        description: row.description,
        duration_minutes: row.duration_minutes,
        calories_burned: row.calories_burned,
        entries,
    })
    .map_err(|err| WorkoutRepositoryError::query(format!("stored workout is invalid: {err}")))?;

    Ok(Workout {
        id: WorkoutId::new(row.id),
        user_id: UserId::new(row.user_id),
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Entries of the given workouts, ordered by workout then position.
async fn load_entries(
    conn: &mut AsyncPgConnection,
    workout_ids: &[i64],
) -> Result<Vec<WorkoutEntryRow>, diesel::result::Error> {
    workout_entries::table
        .filter(workout_entries::workout_id.eq_any(workout_ids))
        .select(WorkoutEntryRow::as_select())
        .order((workout_entries::workout_id, workout_entries::order_index))
        .load::<WorkoutEntryRow>(conn)
        .await
}

/// Load entries for the given workouts and assemble domain aggregates,
/// preserving the order of `rows`.
async fn attach_entries(
    conn: &mut AsyncPgConnection,
    rows: Vec<WorkoutRow>,
) -> Result<Vec<Workout>, WorkoutRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut by_workout: HashMap<i64, Vec<WorkoutEntryRow>> = HashMap::new();
    for entry in load_entries(conn, &ids).await.map_err(map_error)? {
        by_workout.entry(entry.workout_id).or_default().push(entry);
    }

    rows.into_iter()
        .map(|row| {
            let entries = by_workout.remove(&row.id).unwrap_or_default();
            row_to_workout(row, entries)
        })
        .collect()
}

async fn insert_entries(
    conn: &mut AsyncPgConnection,
    workout_id: i64,
    details: &WorkoutDetails,
) -> Result<(), diesel::result::Error> {
    let rows = entry_rows(workout_id, details);
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(workout_entries::table)
        .values(&rows)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl WorkoutRepository for DieselWorkoutRepository {
    async fn create(
        &self,
        owner: UserId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Workout, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let (row, entries) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(workouts::table)
                        .values(&NewWorkoutRow {
                            user_id: owner.get(),
                            title: details.title(),
                            description: details.description(),
                            duration_minutes: details.duration_minutes(),
                            calories_burned: details.calories_burned(),
                            created_at: now,
                            updated_at: now,
                        })
                        .returning(WorkoutRow::as_returning())
                        .get_result::<WorkoutRow>(conn)
                        .await?;
                    insert_entries(conn, row.id, details).await?;
                    let entries = load_entries(conn, &[row.id]).await?;
                    Ok((row, entries))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        row_to_workout(row, entries)
    }

    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let row = workouts::table
            .filter(workouts::id.eq(id.get()))
            .select(WorkoutRow::as_select())
            .first::<WorkoutRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        match row {
            Some(row) => Ok(attach_entries(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let owner = workouts::table
            .filter(workouts::id.eq(id.get()))
            .select(workouts::user_id)
            .first::<i64>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(owner.map(UserId::new))
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Workout>, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let rows = workouts::table
            .filter(workouts::user_id.eq(owner.get()))
            .order((workouts::created_at.desc(), workouts::id.desc()))
            .select(WorkoutRow::as_select())
            .load::<WorkoutRow>(&mut conn)
            .await
            .map_err(map_error)?;

        attach_entries(&mut conn, rows).await
    }

    async fn update(
        &self,
        id: WorkoutId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let updated = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::update(workouts::table.filter(workouts::id.eq(id.get())))
                        .set(&WorkoutChangeset {
                            title: details.title(),
                            description: details.description(),
                            duration_minutes: details.duration_minutes(),
                            calories_burned: details.calories_burned(),
                            updated_at: now,
                        })
                        .returning(WorkoutRow::as_returning())
                        .get_result::<WorkoutRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    diesel::delete(
                        workout_entries::table.filter(workout_entries::workout_id.eq(row.id)),
                    )
                    .execute(conn)
                    .await?;
                    insert_entries(conn, row.id, details).await?;
                    let entries = load_entries(conn, &[row.id]).await?;
                    Ok(Some((row, entries)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        updated
            .map(|(row, entries)| row_to_workout(row, entries))
            .transpose()
    }

    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkoutRepositoryError::connection))?;

        let deleted = diesel::delete(workouts::table.filter(workouts::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(deleted > 0)
    }
}
