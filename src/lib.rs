// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log workouts behind bearer-token authentication
//!
//! This crate provides the backend API for registering users, exchanging
//! credentials for opaque bearer tokens, and managing workouts that only
//! their owner may change.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{CredentialError, CredentialVerifier, TokenIssuer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub credentials: CredentialVerifier,
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Wire every component from one config and one database handle.
    pub fn new(config: Config, db: Database) -> Result<Self, CredentialError> {
        let credentials = CredentialVerifier::new(&config)?;
        let tokens = TokenIssuer::new(db.clone());
        Ok(Self {
            config,
            db,
            credentials,
            tokens,
        })
    }
}
