// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token issuance and resolution against a real (in-memory) database.

use chrono::{Duration, Utc};
use rusqlite::params;
use workout_tracker::db::tables;
use workout_tracker::models::Scope;
use workout_tracker::services::tokens::hash_token;

mod common;

#[tokio::test]
async fn test_issue_then_resolve_returns_owner() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;

    let token = state
        .tokens
        .issue(user.id, Duration::hours(1), Scope::Auth)
        .await
        .unwrap();

    let resolved = state.tokens.resolve(Scope::Auth, &token).await.unwrap();
    assert_eq!(resolved.map(|u| u.username), Some("alice".to_string()));
}

#[tokio::test]
async fn test_only_hash_is_stored() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;
    let token = common::login(&state, &user).await;

    let stored: String = state
        .db
        .call(|conn| Ok(conn.query_row("SELECT hash FROM tokens", [], |row| row.get(0))?))
        .await
        .unwrap();

    assert_ne!(stored, token);
    assert_eq!(stored, hex::encode(hash_token(&token)));
}

#[tokio::test]
async fn test_expired_token_resolves_to_none() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;

    let token = state
        .tokens
        .issue(user.id, Duration::minutes(5), Scope::Auth)
        .await
        .unwrap();

    let before = Utc::now() + Duration::minutes(4);
    let after = Utc::now() + Duration::minutes(6);

    assert!(state
        .tokens
        .resolve_at(Scope::Auth, &token, before)
        .await
        .unwrap()
        .is_some());
    assert!(state
        .tokens
        .resolve_at(Scope::Auth, &token, after)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_zero_ttl_token_is_already_expired() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;

    let token = state
        .tokens
        .issue(user.id, Duration::zero(), Scope::Auth)
        .await
        .unwrap();

    assert!(state
        .tokens
        .resolve(Scope::Auth, &token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_token_of_other_scope_does_not_resolve() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;

    let plaintext = "password-reset-token";
    let hash = hex::encode(hash_token(plaintext));
    let expires_at = (Utc::now() + Duration::hours(1)).timestamp_micros();
    let user_id = user.id;
    state
        .db
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tokens (hash, user_id, scope, expires_at) VALUES (?1, ?2, ?3, ?4)",
                params![hash, user_id, "password_reset", expires_at],
            )?;
            Ok(())
        })
        .await
        .unwrap();

    assert!(state
        .tokens
        .resolve(Scope::Auth, plaintext)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unknown_token_resolves_to_none() {
    let (_, state) = common::create_test_app();
    assert!(state
        .tokens
        .resolve(Scope::Auth, "never-issued")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_purge_removes_only_expired_tokens() {
    let (_, state) = common::create_test_app();
    let user = common::create_user(&state, "alice", "hunter2").await;

    let live = state
        .tokens
        .issue(user.id, Duration::hours(1), Scope::Auth)
        .await
        .unwrap();
    state
        .tokens
        .issue(user.id, Duration::zero(), Scope::Auth)
        .await
        .unwrap();
    assert_eq!(common::count_rows(&state.db, tables::TOKENS).await, 2);

    let removed = state.tokens.purge_expired(Utc::now()).await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(common::count_rows(&state.db, tables::TOKENS).await, 1);
    assert!(state
        .tokens
        .resolve(Scope::Auth, &live)
        .await
        .unwrap()
        .is_some());
}
