// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration.

use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::routes::extract::JsonBody;
use crate::routes::run_blocking;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(register_user))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "username is required and must be at most 50 characters"
    ))]
    pub username: String,
    #[validate(email(message = "email is required and must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Flatten field errors into one message, ordered by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Register a new user.
async fn register_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    req.validate()
        .map_err(|errors| AppError::BadRequest(describe(&errors)))?;

    let verifier = state.credentials.clone();
    let password = req.password;
    let password_hash = run_blocking(move || Ok(verifier.hash(&password)?)).await?;

    let user = state
        .db
        .create_user(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
            bio: req.bio.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            bio: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(request("alice", "alice@example.com", "hunter2")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(request("", "alice@example.com", "pw").validate().is_err());
        assert!(request(&"a".repeat(50), "alice@example.com", "pw")
            .validate()
            .is_ok());
        assert!(request(&"a".repeat(51), "alice@example.com", "pw")
            .validate()
            .is_err());
    }

    #[test]
    fn test_email_and_password_rules() {
        let errors = request("alice", "not-an-email", "").validate().unwrap_err();
        let message = describe(&errors);
        assert_eq!(
            message,
            "email is required and must be a valid address; password is required"
        );

        assert!(request("alice", "", "pw").validate().is_err());
    }
}
