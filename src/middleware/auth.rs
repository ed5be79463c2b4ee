// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication gate and identity extractors.
//!
//! The gate runs on every route. It resolves the `Authorization` header to
//! an [`Identity`] and stores it in the request extensions; handlers then
//! take the identity as an explicit argument via [`CurrentIdentity`] or
//! [`AuthUser`].

use crate::error::AppError;
use crate::middleware::guard::require_authenticated;
use crate::models::{Identity, Scope, User};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Resolve the caller's identity and attach it to the request.
///
/// - no header: anonymous
/// - malformed header: 401, handler never runs
/// - unknown or expired token: 401, handler never runs
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match resolve_identity(&state, request.headers().get(header::AUTHORIZATION))
        .await
    {
        Ok(identity) => identity,
        Err(err) => return vary_on_authorization(err.into_response()),
    };

    request.extensions_mut().insert(identity);
    vary_on_authorization(next.run(request).await)
}

async fn resolve_identity(
    state: &AppState,
    auth_header: Option<&HeaderValue>,
) -> Result<Identity, AppError> {
    let Some(auth_header) = auth_header else {
        return Ok(Identity::Anonymous);
    };

    let token = parse_bearer(auth_header)?;

    match state.tokens.resolve(Scope::Auth, token).await? {
        Some(user) => Ok(Identity::User(user)),
        None => {
            tracing::debug!("Rejected unknown or expired bearer token");
            Err(AppError::InvalidToken)
        }
    }
}

/// Split `Bearer <token>` into its token. Anything else is rejected.
pub fn parse_bearer(value: &HeaderValue) -> Result<&str, AppError> {
    let value = value.to_str().map_err(|_| AppError::InvalidAuthHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => {
            tracing::debug!("Rejected malformed Authorization header");
            Err(AppError::InvalidAuthHeader)
        }
    }
}

/// Responses depend on who is asking.
fn vary_on_authorization(mut response: Response) -> Response {
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

fn identity_from_parts(parts: &Parts) -> Result<Identity, AppError> {
    parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
        tracing::error!(
            path = %parts.uri.path(),
            "Identity requested on a route not covered by the authentication gate"
        );
        AppError::Internal(anyhow::anyhow!(
            "identity requested before authentication gate ran"
        ))
    })
}

/// The caller's identity, possibly anonymous.
///
/// Fails with 500 if the gate did not run; it never falls back to anonymous.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts).map(CurrentIdentity)
    }
}

/// An authenticated caller. Anonymous requests are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = identity_from_parts(parts)?;
        require_authenticated(identity).map(AuthUser)
    }
}
