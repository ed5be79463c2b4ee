// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User operations.

use super::{is_constraint_violation, Database};
use crate::error::AppError;
use crate::models::{NewUser, PasswordHash, Scope, User};
use crate::time_utils::format_utc_rfc3339;
use rusqlite::{params, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, username, email, password_hash, bio, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::from_phc(row.get::<_, String>(3)?),
        bio: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Database {
    /// Insert a new user. A taken username or email is a `Conflict`.
    pub async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.call(move |conn| {
            let now = format_utc_rfc3339(chrono::Utc::now());

            let inserted = conn.execute(
                "INSERT INTO users (username, email, password_hash, bio, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    user.username,
                    user.email,
                    user.password_hash.as_phc(),
                    user.bio,
                    now
                ],
            );

            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => {
                    return Err(AppError::Conflict(
                        "username or email already registered".to_string(),
                    ));
                }
                Err(e) => return Err(e.into()),
            }

            let id = conn.last_insert_rowid();
            tracing::info!(user_id = id, username = %user.username, "Registered user");

            Ok(User {
                id,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                bio: user.bio,
                created_at: now.clone(),
                updated_at: now,
            })
        })
        .await
    }

    /// Look up a user by exact username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        self.call(move |conn| {
            let user = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
                    params![username],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    /// Find the owner of an unexpired token with the given hash and scope.
    ///
    /// `now_micros` is compared against the stored expiry; a token whose
    /// expiry equals `now_micros` is already expired.
    pub async fn get_user_for_token(
        &self,
        scope: Scope,
        token_hash: String,
        now_micros: i64,
    ) -> Result<Option<User>, AppError> {
        self.call(move |conn| {
            let user = conn
                .query_row(
                    "SELECT u.id, u.username, u.email, u.password_hash, u.bio, u.created_at, u.updated_at
                     FROM users u
                     INNER JOIN tokens t ON t.user_id = u.id
                     WHERE t.hash = ?1 AND t.scope = ?2 AND t.expires_at > ?3",
                    params![token_hash, scope.as_str(), now_micros],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }
}
