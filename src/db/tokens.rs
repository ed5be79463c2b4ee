// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token operations. Only hashes are ever written.

use super::Database;
use crate::error::AppError;
use crate::models::Token;
use crate::time_utils::to_micros;
use rusqlite::params;

impl Database {
    /// Store a newly issued token's hash, owner, scope and expiry.
    pub async fn insert_token(&self, token: &Token) -> Result<(), AppError> {
        let hash = hex::encode(token.hash);
        let user_id = token.user_id;
        let scope = token.scope.as_str();
        let expires_at = to_micros(token.expires_at);

        self.call(move |conn| {
            conn.execute(
                "INSERT INTO tokens (hash, user_id, scope, expires_at) VALUES (?1, ?2, ?3, ?4)",
                params![hash, user_id, scope, expires_at],
            )?;
            Ok(())
        })
        .await
    }

    /// Delete every token that expired at or before `now_micros`.
    /// Returns the number of rows removed.
    pub async fn purge_expired_tokens(&self, now_micros: i64) -> Result<usize, AppError> {
        self.call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM tokens WHERE expires_at <= ?1",
                params![now_micros],
            )?;
            Ok(removed)
        })
        .await
    }
}
