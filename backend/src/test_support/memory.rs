//! In-memory repository adapters.
//!
//! They honour the same contracts as the Diesel adapters: unique usernames
//! and emails, scope- and expiry-filtered token lookups, and whole-list
//! replacement of workout entries.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    TokenRepository, TokenRepositoryError, UserPersistenceError, UserRepository,
    WorkoutRepository, WorkoutRepositoryError,
};
use crate::domain::{
    NewUser, PasswordCredential, ProfileUpdate, TokenHash, TokenRecord, TokenScope, User,
    UserAccount, UserId, Workout, WorkoutDetails, WorkoutId,
};

fn lock<'a, T, E>(mutex: &'a Mutex<T>, poisoned: impl FnOnce() -> E) -> Result<MutexGuard<'a, T>, E> {
    mutex.lock().map_err(|_| poisoned())
}

#[derive(Default)]
struct UsersState {
    next_id: i64,
    rows: BTreeMap<UserId, (User, PasswordCredential)>,
}

/// User store backed by a map.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<UsersState>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.rows.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> Result<MutexGuard<'_, UsersState>, UserPersistenceError> {
        lock(&self.state, || UserPersistenceError::query("user store mutex poisoned"))
    }
}

fn username_taken(state: &UsersState, username: &str, except: Option<UserId>) -> bool {
    state
        .rows
        .values()
        .any(|(user, _)| Some(user.id) != except && user.username.as_ref() == username)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.state()?;
        if username_taken(&state, user.username.as_ref(), None) {
            return Err(UserPersistenceError::conflict("username"));
        }
        if state.rows.values().any(|(existing, _)| existing.email == user.email) {
            return Err(UserPersistenceError::conflict("email"));
        }
        state.next_id += 1;
        let created = User {
            id: UserId::new(state.next_id),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            created_at: now,
            updated_at: now,
        };
        state
            .rows
            .insert(created.id, (created.clone(), user.credential.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state()?.rows.get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .state()?
            .rows
            .values()
            .find(|(user, _)| user.username.as_ref() == username)
            .map(|(user, credential)| UserAccount {
                user: user.clone(),
                credential: credential.clone(),
            }))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.state()?;
        if username_taken(&state, update.username.as_ref(), Some(id)) {
            return Err(UserPersistenceError::conflict("username"));
        }
        Ok(state.rows.get_mut(&id).map(|(user, _)| {
            user.username = update.username.clone();
            user.bio = update.bio.clone();
            user.updated_at = now;
            user.clone()
        }))
    }
}

/// Token store backed by a vector.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    rows: Mutex<Vec<TokenRecord>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens, expired ones included.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<TokenRecord>>, TokenRepositoryError> {
        lock(&self.rows, || TokenRepositoryError::query("token store mutex poisoned"))
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn insert(&self, token: &TokenRecord) -> Result<(), TokenRepositoryError> {
        self.rows()?.push(token.clone());
        Ok(())
    }

    async fn find_by_hash_scope_not_expired(
        &self,
        hash: &TokenHash,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Option<TokenRecord>, TokenRepositoryError> {
        Ok(self
            .rows()?
            .iter()
            .find(|row| row.hash == *hash && row.scope == scope && row.is_valid_at(now))
            .cloned())
    }

    async fn delete_all_for_user(
        &self,
        user_id: UserId,
        scope: TokenScope,
    ) -> Result<u64, TokenRepositoryError> {
        let mut rows = self.rows()?;
        let before = rows.len();
        rows.retain(|row| !(row.user_id == user_id && row.scope == scope));
        Ok(u64::try_from(before - rows.len()).unwrap_or(u64::MAX))
    }
}

#[derive(Default)]
struct WorkoutsState {
    next_id: i64,
    rows: BTreeMap<WorkoutId, Workout>,
}

/// Workout store backed by a map.
#[derive(Default)]
pub struct InMemoryWorkoutRepository {
    state: Mutex<WorkoutsState>,
}

impl InMemoryWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, WorkoutsState>, WorkoutRepositoryError> {
        lock(&self.state, || WorkoutRepositoryError::query("workout store mutex poisoned"))
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    async fn create(
        &self,
        owner: UserId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Workout, WorkoutRepositoryError> {
        let mut state = self.state()?;
        state.next_id += 1;
        let workout = Workout {
            id: WorkoutId::new(state.next_id),
            user_id: owner,
            details: details.clone(),
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(workout.id, workout.clone());
        Ok(workout)
    }

    async fn find_by_id(&self, id: WorkoutId) -> Result<Option<Workout>, WorkoutRepositoryError> {
        Ok(self.state()?.rows.get(&id).cloned())
    }

    async fn find_owner(&self, id: WorkoutId) -> Result<Option<UserId>, WorkoutRepositoryError> {
        Ok(self.state()?.rows.get(&id).map(|workout| workout.user_id))
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Workout>, WorkoutRepositoryError> {
        let state = self.state()?;
        let mut workouts: Vec<_> = state
            .rows
            .values()
            .filter(|workout| workout.user_id == owner)
            .cloned()
            .collect();
        workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(workouts)
    }

    async fn update(
        &self,
        id: WorkoutId,
        details: &WorkoutDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<Workout>, WorkoutRepositoryError> {
        Ok(self.state()?.rows.get_mut(&id).map(|workout| {
            workout.details = details.clone();
            workout.updated_at = now;
            workout.clone()
        }))
    }

    async fn delete(&self, id: WorkoutId) -> Result<bool, WorkoutRepositoryError> {
        Ok(self.state()?.rows.remove(&id).is_some())
    }
}
