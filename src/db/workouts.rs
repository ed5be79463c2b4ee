// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout operations.
//!
//! A workout and its entries are always written in one transaction. The
//! entry list is validated before the transaction starts, so an invalid
//! list never produces a partial write.

use super::Database;
use crate::error::AppError;
use crate::models::workout::validate_entries;
use crate::models::{NewWorkout, NewWorkoutEntry, Workout, WorkoutEntry, WorkoutPatch};
use crate::time_utils::format_utc_rfc3339;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        duration_minutes: row.get(4)?,
        calories_burned: row.get(5)?,
        entries: Vec::new(),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutEntry> {
    Ok(WorkoutEntry {
        id: row.get(0)?,
        exercise_name: row.get(1)?,
        sets: row.get(2)?,
        reps: row.get(3)?,
        duration_seconds: row.get(4)?,
        weight: row.get(5)?,
        notes: row.get(6)?,
        order_index: row.get(7)?,
    })
}

/// Load a workout and its entries, ordered by `order_index`.
fn load_workout(conn: &Connection, id: i64) -> rusqlite::Result<Option<Workout>> {
    let workout = conn
        .query_row(
            "SELECT id, user_id, title, description, duration_minutes, calories_burned,
                    created_at, updated_at
             FROM workouts WHERE id = ?1",
            params![id],
            workout_from_row,
        )
        .optional()?;

    let Some(mut workout) = workout else {
        return Ok(None);
    };

    let mut stmt = conn.prepare_cached(
        "SELECT id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index
         FROM workout_entries
         WHERE workout_id = ?1
         ORDER BY order_index, id",
    )?;
    workout.entries = stmt
        .query_map(params![id], entry_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Some(workout))
}

fn insert_entries(
    conn: &Connection,
    workout_id: i64,
    entries: &[NewWorkoutEntry],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO workout_entries
            (workout_id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for entry in entries {
        stmt.execute(params![
            workout_id,
            entry.exercise_name,
            entry.sets,
            entry.reps,
            entry.duration_seconds,
            entry.weight,
            entry.notes,
            entry.order_index,
        ])?;
    }
    Ok(())
}

impl Database {
    /// Create a workout owned by `user_id` together with its entries.
    pub async fn create_workout(
        &self,
        user_id: i64,
        workout: NewWorkout,
    ) -> Result<Workout, AppError> {
        validate_entries(&workout.entries)?;

        self.call(move |conn| {
            let now = format_utc_rfc3339(chrono::Utc::now());
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO workouts
                    (user_id, title, description, duration_minutes, calories_burned,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    user_id,
                    workout.title,
                    workout.description,
                    workout.duration_minutes,
                    workout.calories_burned,
                    now
                ],
            )?;
            let id = tx.last_insert_rowid();
            insert_entries(&tx, id, &workout.entries)?;

            let created = load_workout(&tx, id)?.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("workout {} vanished after insert", id))
            })?;
            tx.commit()?;

            tracing::info!(
                workout_id = id,
                user_id,
                entries = created.entries.len(),
                "Created workout"
            );
            Ok(created)
        })
        .await
    }

    /// Get a workout with its ordered entries.
    pub async fn get_workout_by_id(&self, id: i64) -> Result<Option<Workout>, AppError> {
        self.call(move |conn| Ok(load_workout(conn, id)?)).await
    }

    /// Get only the owning user id of a workout.
    pub async fn get_workout_owner(&self, id: i64) -> Result<Option<i64>, AppError> {
        self.call(move |conn| {
            let owner = conn
                .query_row(
                    "SELECT user_id FROM workouts WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(owner)
        })
        .await
    }

    /// Apply `patch` to a workout. A supplied entry list replaces the old one
    /// wholesale. Returns `None` if the workout does not exist.
    pub async fn update_workout(
        &self,
        id: i64,
        patch: WorkoutPatch,
    ) -> Result<Option<Workout>, AppError> {
        if let Some(entries) = &patch.entries {
            validate_entries(entries)?;
        }

        self.call(move |conn| {
            let tx = conn.transaction()?;

            let Some(mut workout) = load_workout(&tx, id)? else {
                return Ok(None);
            };
            patch.apply_scalars(&mut workout);
            workout.updated_at = format_utc_rfc3339(chrono::Utc::now());

            tx.execute(
                "UPDATE workouts
                 SET title = ?1, description = ?2, duration_minutes = ?3,
                     calories_burned = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    workout.title,
                    workout.description,
                    workout.duration_minutes,
                    workout.calories_burned,
                    workout.updated_at,
                    id
                ],
            )?;

            if let Some(entries) = &patch.entries {
                tx.execute(
                    "DELETE FROM workout_entries WHERE workout_id = ?1",
                    params![id],
                )?;
                insert_entries(&tx, id, entries)?;
            }

            let updated = load_workout(&tx, id)?;
            tx.commit()?;

            tracing::info!(
                workout_id = id,
                entries_replaced = patch.entries.is_some(),
                "Updated workout"
            );
            Ok(updated)
        })
        .await
    }

    /// Delete a workout and its entries. Returns `false` if there was no such
    /// workout.
    pub async fn delete_workout(&self, id: i64) -> Result<bool, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM workout_entries WHERE workout_id = ?1",
                params![id],
            )?;
            let removed = tx.execute("DELETE FROM workouts WHERE id = ?1", params![id])?;
            tx.commit()?;

            if removed > 0 {
                tracing::info!(workout_id = id, "Deleted workout");
            }
            Ok(removed > 0)
        })
        .await
    }
}
