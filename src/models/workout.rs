// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout model: a workout owned by one user and its ordered entries.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored workout with its entries in `order_index` order.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    /// Owning user. Set at creation, never changed.
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: i64,
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration_minutes: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub calories_burned: i64,
    pub entries: Vec<WorkoutEntry>,
    pub created_at: String,
    pub updated_at: String,
}

/// One exercise within a workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub exercise_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub sets: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub reps: Option<i64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub duration_seconds: Option<i64>,
    pub weight: Option<f64>,
    pub notes: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub order_index: i64,
}

/// Request body for creating a workout. The owner comes from the
/// authenticated identity, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkout {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub calories_burned: i64,
    #[serde(default)]
    pub entries: Vec<NewWorkoutEntry>,
}

/// Entry as supplied by a client, before it has an id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewWorkoutEntry {
    pub exercise_name: String,
    pub sets: i64,
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
    pub order_index: i64,
}

impl NewWorkoutEntry {
    /// An entry is measured either by repetitions or by time, never both
    /// and never neither.
    pub fn is_well_formed(&self) -> bool {
        self.reps.is_some() != self.duration_seconds.is_some()
    }
}

/// Reject the whole list if any entry breaks the reps/duration rule.
pub fn validate_entries(entries: &[NewWorkoutEntry]) -> Result<(), AppError> {
    match entries.iter().position(|entry| !entry.is_well_formed()) {
        Some(index) => Err(AppError::Validation(format!(
            "entry {} ({}): exactly one of reps or duration_seconds must be set",
            index, entries[index].exercise_name
        ))),
        None => Ok(()),
    }
}

/// Partial update. `None` means "not supplied"; present fields overwrite.
///
/// Has no owner field: ownership cannot be transferred.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub calories_burned: Option<i64>,
    /// Replaces the whole entry list when present.
    #[serde(default)]
    pub entries: Option<Vec<NewWorkoutEntry>>,
}

impl WorkoutPatch {
    /// Copy the present scalar fields onto `workout`. Entries are replaced by
    /// the store, inside its transaction.
    pub fn apply_scalars(&self, workout: &mut Workout) {
        if let Some(title) = &self.title {
            workout.title = title.clone();
        }
        if let Some(description) = &self.description {
            workout.description = description.clone();
        }
        if let Some(duration_minutes) = self.duration_minutes {
            workout.duration_minutes = duration_minutes;
        }
        if let Some(calories_burned) = self.calories_burned {
            workout.calories_burned = calories_burned;
        }
    }
}
