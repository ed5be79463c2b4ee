// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Bearer token model.

use chrono::{DateTime, Utc};

/// Capability class a token is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Auth,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Auth => "auth",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly issued token.
///
/// `plaintext` goes back to the client exactly once; only `hash` is stored.
pub struct Token {
    pub plaintext: String,
    pub hash: [u8; 32],
    pub user_id: i64,
    pub scope: Scope,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("user_id", &self.user_id)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
