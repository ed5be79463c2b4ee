// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization checks on resolved identities.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Identity, User};

/// Reject the anonymous identity.
pub fn require_authenticated(identity: Identity) -> Result<User, AppError> {
    match identity {
        Identity::User(user) => Ok(user),
        Identity::Anonymous => Err(AppError::Unauthorized),
    }
}

/// Reject `user` unless it owns the resource.
pub fn require_owner(owner_id: i64, user: &User) -> Result<(), AppError> {
    if owner_id == user.id {
        Ok(())
    } else {
        tracing::warn!(
            user_id = user.id,
            owner_id,
            "Rejected mutation of a resource owned by another user"
        );
        Err(AppError::Forbidden(
            "you are not the owner of this workout".to_string(),
        ))
    }
}

/// Confirm the workout exists, then that `user` owns it.
///
/// The order matters: a missing workout is always 404, whoever asks.
pub async fn require_workout_owner(
    db: &Database,
    workout_id: i64,
    user: &User,
) -> Result<(), AppError> {
    let owner_id = db
        .get_workout_owner(workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("workout {} not found", workout_id)))?;

    require_owner(owner_id, user)
}
