// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout routes.
//!
//! Reads are public. Create needs a signed-in user; update and delete also
//! need ownership, checked only after the workout is known to exist.

use crate::error::{AppError, Result};
use crate::middleware::guard::require_workout_owner;
use crate::middleware::{AuthUser, CurrentIdentity};
use crate::models::{Identity, NewWorkout, Workout, WorkoutPatch};
use crate::routes::extract::{IdParam, JsonBody};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/workouts", post(create_workout)).route(
        "/workouts/{id}",
        get(get_workout).put(update_workout).delete(delete_workout),
    )
}

#[derive(Serialize)]
pub struct WorkoutResponse {
    pub workout: Workout,
}

#[derive(Serialize)]
pub struct UpdatedWorkoutResponse {
    pub updated_workout: Workout,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("workout {} not found", id))
}

/// Get a workout and its entries. Anyone may read.
async fn get_workout(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    IdParam(id): IdParam,
) -> Result<Json<WorkoutResponse>> {
    let viewer_id = match &identity {
        Identity::User(user) => Some(user.id),
        Identity::Anonymous => None,
    };
    tracing::debug!(workout_id = id, viewer_id, "Reading workout");

    let workout = state
        .db
        .get_workout_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(WorkoutResponse { workout }))
}

/// Create a workout owned by the caller.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(workout): JsonBody<NewWorkout>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    let workout = state.db.create_workout(user.id, workout).await?;
    Ok((StatusCode::CREATED, Json(WorkoutResponse { workout })))
}

/// Patch a workout the caller owns.
async fn update_workout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdParam(id): IdParam,
    JsonBody(patch): JsonBody<WorkoutPatch>,
) -> Result<Json<UpdatedWorkoutResponse>> {
    require_workout_owner(&state.db, id, &user).await?;

    let updated_workout = state
        .db
        .update_workout(id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(UpdatedWorkoutResponse { updated_workout }))
}

/// Delete a workout the caller owns.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdParam(id): IdParam,
) -> Result<StatusCode> {
    require_workout_owner(&state.db, id, &user).await?;

    if state.db.delete_workout(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
