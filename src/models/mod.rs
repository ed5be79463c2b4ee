// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod token;
pub mod user;
pub mod workout;

pub use token::{Scope, Token};
pub use user::{Identity, NewUser, PasswordHash, User};
pub use workout::{
    validate_entries, NewWorkout, NewWorkoutEntry, Workout, WorkoutEntry, WorkoutPatch,
};
