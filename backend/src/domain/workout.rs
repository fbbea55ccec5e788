//! Workout records owned by users.
//!
//! Drafts arrive from clients and are validated into [`WorkoutDetails`]
//! before they reach a repository. Each entry measures its effort either in
//! repetitions or in seconds, never both.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum length of a workout title.
pub const TITLE_MAX: usize = 100;

/// Validation failures for workouts and their entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkoutValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("durationMinutes must not be negative")]
    NegativeDuration,
    #[error("caloriesBurned must not be negative")]
    NegativeCalories,
    #[error("entry {index}: exerciseName is required")]
    EmptyExerciseName { index: usize },
    #[error("entry {index}: sets must be greater than zero")]
    NonPositiveSets { index: usize },
    #[error("entry {index}: exactly one of reps or durationSeconds must be set")]
    AmbiguousMeasure { index: usize },
    #[error("entry {index}: reps must be greater than zero")]
    NonPositiveReps { index: usize },
    #[error("entry {index}: durationSeconds must be greater than zero")]
    NonPositiveEntryDuration { index: usize },
    #[error("entry {index}: weight must be a non-negative number")]
    InvalidWeight { index: usize },
    #[error("entry {index}: orderIndex must not be negative")]
    NegativeOrderIndex { index: usize },
}

/// Store-assigned workout identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(i64);

impl WorkoutId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unvalidated workout entry as supplied by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntryDraft {
    #[schema(example = "Squat")]
    pub exercise_name: String,
    #[schema(example = 3)]
    pub sets: i32,
    #[serde(default)]
    #[schema(example = 10)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
    #[serde(default)]
    #[schema(example = 80.5)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub order_index: i32,
}

/// A single exercise within a workout.
///
/// ## Invariants
/// - `exercise_name` is non-empty once trimmed.
/// - `sets > 0`.
/// - Exactly one of `reps` and `duration_seconds` is set, and it is positive.
/// - `weight`, when present, is finite and non-negative.
/// - `order_index >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    exercise_name: String,
    sets: i32,
    reps: Option<i32>,
    duration_seconds: Option<i32>,
    weight: Option<f64>,
    notes: String,
    order_index: i32,
}

impl WorkoutEntry {
    /// Validate a draft; `index` is its position in the request, for messages.
    pub fn try_new(draft: WorkoutEntryDraft, index: usize) -> Result<Self, WorkoutValidationError> {
        let name = draft.exercise_name.trim();
        if name.is_empty() {
            return Err(WorkoutValidationError::EmptyExerciseName { index });
        }
        if draft.sets <= 0 {
            return Err(WorkoutValidationError::NonPositiveSets { index });
        }
        match (draft.reps, draft.duration_seconds) {
            (Some(reps), None) if reps <= 0 => {
                return Err(WorkoutValidationError::NonPositiveReps { index });
            }
            (None, Some(seconds)) if seconds <= 0 => {
                return Err(WorkoutValidationError::NonPositiveEntryDuration { index });
            }
            (Some(_), None) | (None, Some(_)) => {}
            _ => return Err(WorkoutValidationError::AmbiguousMeasure { index }),
        }
        if draft
            .weight
            .is_some_and(|weight| !weight.is_finite() || weight < 0.0)
        {
            return Err(WorkoutValidationError::InvalidWeight { index });
        }
        if draft.order_index < 0 {
            return Err(WorkoutValidationError::NegativeOrderIndex { index });
        }
        Ok(Self {
            exercise_name: name.to_owned(),
            sets: draft.sets,
            reps: draft.reps,
            duration_seconds: draft.duration_seconds,
            weight: draft.weight,
            notes: draft.notes,
            order_index: draft.order_index,
        })
    }

    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    pub fn sets(&self) -> i32 {
        self.sets
    }

    pub fn reps(&self) -> Option<i32> {
        self.reps
    }

    pub fn duration_seconds(&self) -> Option<i32> {
        self.duration_seconds
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl From<WorkoutEntry> for WorkoutEntryDraft {
    fn from(value: WorkoutEntry) -> Self {
        Self {
            exercise_name: value.exercise_name,
            sets: value.sets,
            reps: value.reps,
            duration_seconds: value.duration_seconds,
            weight: value.weight,
            notes: value.notes,
            order_index: value.order_index,
        }
    }
}

/// Unvalidated workout as supplied by a client on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDraft {
    #[schema(example = "Leg day")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(example = 45)]
    pub duration_minutes: i32,
    #[serde(default)]
    #[schema(example = 350)]
    pub calories_burned: i32,
    #[serde(default)]
    pub entries: Vec<WorkoutEntryDraft>,
}

/// Partial update; absent fields keep their current value and `entries`,
/// when present, replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub calories_burned: Option<i32>,
    #[serde(default)]
    pub entries: Option<Vec<WorkoutEntryDraft>>,
}

/// Validated, owner-independent content of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetails {
    title: String,
    description: String,
    duration_minutes: i32,
    calories_burned: i32,
    entries: Vec<WorkoutEntry>,
}

impl WorkoutDetails {
    /// Validate a draft. Entries are kept sorted by `order_index`.
    pub fn try_new(draft: WorkoutDraft) -> Result<Self, WorkoutValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(WorkoutValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(WorkoutValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if draft.duration_minutes < 0 {
            return Err(WorkoutValidationError::NegativeDuration);
        }
        if draft.calories_burned < 0 {
            return Err(WorkoutValidationError::NegativeCalories);
        }
        let mut entries = draft
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| WorkoutEntry::try_new(entry, index))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(WorkoutEntry::order_index);
        Ok(Self {
            title: title.to_owned(),
            description: draft.description,
            duration_minutes: draft.duration_minutes,
            calories_burned: draft.calories_burned,
            entries,
        })
    }

    /// Apply a partial update and revalidate the result.
    pub fn patched(&self, patch: WorkoutPatch) -> Result<Self, WorkoutValidationError> {
        let current = self.clone();
        Self::try_new(WorkoutDraft {
            title: patch.title.unwrap_or(current.title),
            description: patch.description.unwrap_or(current.description),
            duration_minutes: patch.duration_minutes.unwrap_or(current.duration_minutes),
            calories_burned: patch.calories_burned.unwrap_or(current.calories_burned),
            entries: match patch.entries {
                Some(entries) => entries,
                None => current.entries.into_iter().map(Into::into).collect(),
            },
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn calories_burned(&self) -> i32 {
        self.calories_burned
    }

    pub fn entries(&self) -> &[WorkoutEntry] {
        &self.entries
    }
}

/// A persisted workout.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[schema(value_type = i64, example = 1)]
    pub id: WorkoutId,
    #[schema(value_type = i64, example = 1)]
    pub user_id: UserId,
    #[serde(flatten)]
    pub details: WorkoutDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "workout_tests.rs"]
mod tests;
