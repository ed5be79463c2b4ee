// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid Authorization header")]
    InvalidAuthHeader,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidAuthHeader
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Database(format!("Connection pool: {}", err))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match &self {
            AppError::Unauthorized => ("unauthorized", None),
            AppError::InvalidAuthHeader => ("invalid_authorization_header", None),
            AppError::InvalidToken => ("invalid_token", None),
            AppError::InvalidCredentials => ("invalid_credentials", None),
            AppError::Forbidden(msg) => ("forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => ("not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => ("bad_request", Some(msg.clone())),
            AppError::Validation(msg) => ("validation_failed", Some(msg.clone())),
            AppError::Conflict(msg) => ("conflict", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                ("database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
