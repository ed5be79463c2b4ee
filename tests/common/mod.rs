// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use workout_tracker::config::Config;
use workout_tracker::db::Database;
use workout_tracker::models::{NewUser, Scope, User};
use workout_tracker::routes::create_router;
use workout_tracker::AppState;

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Like [`create_test_app`], with a caller-supplied config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let state = Arc::new(AppState::new(config, db).expect("Failed to build state"));
    (create_router(state.clone()), state)
}

/// Number of rows currently in `table`.
#[allow(dead_code)]
pub async fn count_rows(db: &Database, table: &'static str) -> i64 {
    db.call(move |conn| {
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    })
    .await
    .unwrap()
}

/// Insert a user directly, with `password` as their password.
#[allow(dead_code)]
pub async fn create_user(state: &AppState, username: &str, password: &str) -> User {
    let password_hash = state.credentials.hash(password).unwrap();
    state
        .db
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
            bio: String::new(),
        })
        .await
        .unwrap()
}

/// Issue a day-long auth token for `user`.
#[allow(dead_code)]
pub async fn login(state: &AppState, user: &User) -> String {
    state
        .tokens
        .issue(user.id, chrono::Duration::hours(24), Scope::Auth)
        .await
        .unwrap()
}

/// Build a JSON request with an optional bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodiless request with an optional bearer token.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid workout body with one rep-based and one timed entry.
#[allow(dead_code)]
pub fn sample_workout() -> serde_json::Value {
    serde_json::json!({
        "title": "push day",
        "description": "upper body day",
        "duration_minutes": 60,
        "calories_burned": 200,
        "entries": [
            {
                "exercise_name": "Bench Press",
                "sets": 3,
                "reps": 10,
                "weight": 135.5,
                "notes": "Warm up properly",
                "order_index": 1
            },
            {
                "exercise_name": "Plank",
                "sets": 3,
                "duration_seconds": 60,
                "order_index": 2
            }
        ]
    })
}
