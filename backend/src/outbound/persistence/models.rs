//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{tokens, users, workout_entries, workouts};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a [u8],
    pub bio: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a user edits their profile.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub username: &'a str,
    pub bio: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TokenRow {
    pub hash: Vec<u8>,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tokens)]
pub(crate) struct NewTokenRow<'a> {
    pub hash: &'a [u8],
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkoutRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workouts)]
pub(crate) struct NewWorkoutRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset replacing the scalar columns of a workout.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = workouts)]
pub(crate) struct WorkoutChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workout_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkoutEntryRow {
    #[expect(dead_code, reason = "entries are addressed through their workout")]
    pub id: i64,
    pub workout_id: i64,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workout_entries)]
pub(crate) struct NewWorkoutEntryRow<'a> {
    pub workout_id: i64,
    pub exercise_name: &'a str,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub weight: Option<f64>,
    pub notes: &'a str,
    pub order_index: i32,
}
