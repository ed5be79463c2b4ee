// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication gate, authorization guards).

pub mod auth;
pub mod guard;

pub use auth::{authenticate, AuthUser, CurrentIdentity};
