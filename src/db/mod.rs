// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite behind an r2d2 pool).
//!
//! Provides typed operations for:
//! - Users (registration, lookup)
//! - Tokens (hashed bearer tokens)
//! - Workouts (workout rows plus their ordered entries)

pub mod tokens;
pub mod users;
pub mod workouts;

use crate::config::Config;
use crate::error::AppError;
use r2d2_sqlite::SqliteConnectionManager;
use std::time::Duration;

/// Path value that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const TOKENS: &str = "tokens";
    pub const WORKOUTS: &str = "workouts";
    pub const WORKOUT_ENTRIES: &str = "workout_entries";
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    bio TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tokens (
    hash TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    scope TEXT NOT NULL,
    expires_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tokens_expires ON tokens(expires_at);

CREATE TABLE IF NOT EXISTS workouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    duration_minutes INTEGER NOT NULL,
    calories_burned INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    exercise_name TEXT NOT NULL,
    sets INTEGER NOT NULL,
    reps INTEGER,
    duration_seconds INTEGER,
    weight REAL,
    notes TEXT NOT NULL DEFAULT '',
    order_index INTEGER NOT NULL,
    CHECK ((reps IS NULL) <> (duration_seconds IS NULL))
);
CREATE INDEX IF NOT EXISTS idx_workout_entries_workout ON workout_entries(workout_id, order_index);
";

/// SQLite database handle. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open the database named by `config.database_path`.
    ///
    /// `:memory:` gets a single-connection pool whose connection is never
    /// recycled, since every new in-memory connection is a fresh database.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        let in_memory = config.database_path == IN_MEMORY;

        let manager = if in_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(&config.database_path)
        }
        .with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });

        let builder = r2d2::Pool::builder();
        let builder = if in_memory {
            builder
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder.max_size(config.database_pool_size.max(1))
        };

        let pool = builder.build(manager)?;

        if !in_memory {
            pool.get()?.execute_batch("PRAGMA journal_mode = WAL;")?;
        }

        tracing::info!(
            path = %config.database_path,
            pool_size = pool.max_size(),
            "Opened SQLite database"
        );

        Ok(Self { pool })
    }

    /// Open a fresh, migrated in-memory database.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let db = Self::open(&Config::test_default())?;
        db.migrate()?;
        Ok(db)
    }

    /// Create any missing tables. Safe to run on every startup.
    pub fn migrate(&self) -> Result<(), AppError> {
        self.pool.get()?.execute_batch(SCHEMA)?;
        tracing::debug!("Schema up to date");
        Ok(())
    }

    /// Run `op` with a pooled connection on the blocking thread pool.
    pub async fn call<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            op(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Database task failed: {}", e)))?
    }
}

/// True if `err` is a UNIQUE/CHECK/FK constraint violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
