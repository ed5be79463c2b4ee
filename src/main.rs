// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker API Server
//!
//! Registers users, issues bearer tokens, and stores workouts that only
//! their owners may change.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{config::Config, db::Database, services::tokens::spawn_reaper, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Workout Tracker API");

    // Open database and create tables
    let db = Database::open(&config)?;
    db.migrate()?;

    let state = Arc::new(AppState::new(config.clone(), db)?);
    tracing::info!(
        token_ttl_hours = config.token_ttl_hours,
        "Credential verifier and token issuer initialized"
    );

    // Expired tokens are inert unless an operator asks for a reaper
    if let Some(secs) = config.token_reap_interval_secs.filter(|secs| *secs > 0) {
        spawn_reaper(state.tokens.clone(), std::time::Duration::from_secs(secs));
    }

    // Build router
    let app = workout_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("workout_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
