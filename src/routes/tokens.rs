// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Username/password login, answered with a bearer token.

use crate::error::{AppError, Result};
use crate::models::Scope;
use crate::routes::extract::JsonBody;
use crate::routes::run_blocking;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tokens", post(create_token))
}

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// Exchange username and password for an `auth`-scoped token.
///
/// Unknown username and wrong password are indistinguishable to the caller.
async fn create_token(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTokenRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let user = state.db.get_user_by_username(&req.username).await?;
    let verifier = state.credentials.clone();
    let password = req.password;

    let Some(user) = user else {
        run_blocking(move || Ok(verifier.verify_dummy(&password))).await?;
        tracing::info!("Login attempt for unknown username");
        return Err(AppError::InvalidCredentials);
    };

    let stored = user.password_hash.clone();
    let matches = run_blocking(move || Ok(verifier.verify(&stored, &password)?)).await?;
    if !matches {
        tracing::info!(user_id = user.id, "Login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let ttl = state.config.token_ttl().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "token_ttl_hours {} is out of range",
            state.config.token_ttl_hours
        ))
    })?;
    let auth_token = state.tokens.issue(user.id, ttl, Scope::Auth).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { auth_token })))
}
