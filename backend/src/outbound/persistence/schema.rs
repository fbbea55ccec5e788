//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the files under `backend/migrations`
//! exactly. `diesel print-schema` against a migrated database regenerates
//! them.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` and `email` carry the `users_username_key` and
    /// `users_email_key` unique constraints.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string, stored as raw bytes.
        password_hash -> Bytea,
        bio -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens, keyed by the SHA-256 digest of the plaintext.
    tokens (hash) {
        hash -> Bytea,
        user_id -> Int8,
        expiry -> Timestamptz,
        scope -> Text,
    }
}

diesel::table! {
    /// Workouts owned by a single user.
    workouts (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        description -> Text,
        duration_minutes -> Int4,
        calories_burned -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered exercise entries of a workout.
    ///
    /// Exactly one of `reps` and `duration_seconds` is non-null.
    workout_entries (id) {
        id -> Int8,
        workout_id -> Int8,
        exercise_name -> Varchar,
        sets -> Int4,
        reps -> Nullable<Int4>,
        duration_seconds -> Nullable<Int4>,
        weight -> Nullable<Float8>,
        notes -> Text,
        order_index -> Int4,
    }
}

diesel::joinable!(tokens -> users (user_id));
diesel::joinable!(workouts -> users (user_id));
diesel::joinable!(workout_entries -> workouts (workout_id));

diesel::allow_tables_to_appear_in_same_query!(users, tokens, workouts, workout_entries);
