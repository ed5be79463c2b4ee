// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - credential and token logic.

pub mod credentials;
pub mod tokens;

pub use credentials::{CredentialError, CredentialVerifier};
pub use tokens::TokenIssuer;

impl From<CredentialError> for crate::error::AppError {
    fn from(err: CredentialError) -> Self {
        crate::error::AppError::Internal(anyhow::Error::new(err))
    }
}
