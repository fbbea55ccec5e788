//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Rows are converted back through the validated `Username` and `Email`
//! constructors so a hand-edited row surfaces as a query error instead of
//! leaking into the domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordCredential, ProfileUpdate, User, UserAccount, UserId, Username,
};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation_field};
use super::models::{NewUserRow, ProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

const UNIQUE_COLUMNS: &[&str] = &["username", "email"];

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(error: diesel::result::Error) -> UserPersistenceError {
    match unique_violation_field(&error, UNIQUE_COLUMNS) {
        Some(field) => UserPersistenceError::conflict(field),
        None => map_read_error(error),
    }
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let UserRow {
        id,
        username,
        email,
        password_hash,
        bio,
        created_at,
        updated_at,
    } = row;
    let user = User {
        id: UserId::new(id),
        username: Username::new(username)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?,
        email: Email::new(email).map_err(|err| UserPersistenceError::query(err.to_string()))?,
        bio,
        created_at,
        updated_at,
    };
    Ok(UserAccount {
        user,
        credential: PasswordCredential::from_stored(password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_account(row).map(|account| account.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.credential.as_bytes(),
            bio: &user.bio,
            created_at: now,
            updated_at: now,
        };

        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        row_to_user(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_account).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let changes = ProfileChangeset {
            username: update.username.as_ref(),
            bio: &update.bio,
            updated_at: now,
        };

        let row = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_write_error)?;

        row.map(row_to_user).transpose()
    }
}
