// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup and handed to each component's
//! constructor through [`crate::AppState`].

use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// SQLite database path, or `:memory:` for an in-memory database
    pub database_path: String,
    /// Maximum number of pooled SQLite connections
    pub database_pool_size: u32,
    /// Lifetime of an issued auth token, in hours
    pub token_ttl_hours: i64,
    /// How often to purge expired tokens. `None` leaves expired rows in place.
    pub token_reap_interval_secs: Option<u64>,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    pub argon2_iterations: u32,
    /// Argon2 lanes
    pub argon2_parallelism: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            database_path: "workouts.db".to_string(),
            database_pool_size: 8,
            token_ttl_hours: 24,
            token_reap_interval_secs: None,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    /// Config for tests: in-memory database and the cheapest Argon2 cost.
    pub fn test_default() -> Self {
        Self {
            database_path: crate::db::IN_MEMORY.to_string(),
            argon2_memory_kib: argon2::Params::MIN_M_COST,
            argon2_iterations: argon2::Params::MIN_T_COST,
            argon2_parallelism: argon2::Params::MIN_P_COST,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local
    /// development. Unset variables fall back to [`Config::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            database_pool_size: parse_var("DATABASE_POOL_SIZE")?
                .unwrap_or(defaults.database_pool_size),
            token_ttl_hours: match parse_var("TOKEN_TTL_HOURS")? {
                Some(hours) => check_token_ttl_hours(hours)?,
                None => defaults.token_ttl_hours,
            },
            token_reap_interval_secs: parse_var("TOKEN_REAP_INTERVAL_SECS")?,
            argon2_memory_kib: parse_var("ARGON2_MEMORY_KIB")?
                .unwrap_or(defaults.argon2_memory_kib),
            argon2_iterations: parse_var("ARGON2_ITERATIONS")?
                .unwrap_or(defaults.argon2_iterations),
            argon2_parallelism: parse_var("ARGON2_PARALLELISM")?
                .unwrap_or(defaults.argon2_parallelism),
        })
    }

    /// Token lifetime as a chrono duration. `None` if `token_ttl_hours` is
    /// not positive or an expiry that far out cannot be represented.
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        ttl_from_hours(self.token_ttl_hours)
    }
}

fn ttl_from_hours(hours: i64) -> Option<chrono::Duration> {
    if hours <= 0 {
        return None;
    }
    let ttl = chrono::Duration::try_hours(hours)?;
    chrono::Utc::now().checked_add_signed(ttl).map(|_| ttl)
}

fn check_token_ttl_hours(hours: i64) -> Result<i64, ConfigError> {
    match ttl_from_hours(hours) {
        Some(_) => Ok(hours),
        None => Err(ConfigError::Invalid("TOKEN_TTL_HOURS", hours.to_string())),
    }
}

/// Read and parse an optional environment variable.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("TOKEN_TTL_HOURS", "2");
        env::remove_var("TOKEN_REAP_INTERVAL_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.token_ttl(), Some(chrono::Duration::hours(2)));
        assert_eq!(config.token_reap_interval_secs, None);

        env::remove_var("PORT");
        env::remove_var("TOKEN_TTL_HOURS");
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("WORKOUT_TRACKER_TEST_POOL", "many");
        let err = parse_var::<u32>("WORKOUT_TRACKER_TEST_POOL").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("WORKOUT_TRACKER_TEST_POOL", _)));
        env::remove_var("WORKOUT_TRACKER_TEST_POOL");
    }

    #[test]
    fn test_token_ttl_must_be_positive() {
        for hours in [0, -1, i64::MIN] {
            let err = check_token_ttl_hours(hours).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid("TOKEN_TTL_HOURS", _)));
        }
        assert_eq!(check_token_ttl_hours(1).unwrap(), 1);
    }

    #[test]
    fn test_token_ttl_must_fit_in_a_timestamp() {
        for hours in [3_000_000_000, i64::MAX] {
            let err = check_token_ttl_hours(hours).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid("TOKEN_TTL_HOURS", _)));
        }
        assert_eq!(check_token_ttl_hours(24 * 365).unwrap(), 24 * 365);
    }

    #[test]
    fn test_out_of_range_ttl_has_no_duration() {
        let config = Config {
            token_ttl_hours: 3_000_000_000,
            ..Config::test_default()
        };
        assert_eq!(config.token_ttl(), None);

        let config = Config {
            token_ttl_hours: -1,
            ..Config::test_default()
        };
        assert_eq!(config.token_ttl(), None);
    }

    #[test]
    fn test_default_is_cheap_and_in_memory() {
        let config = Config::test_default();
        assert_eq!(config.database_path, crate::db::IN_MEMORY);
        assert_eq!(config.argon2_memory_kib, argon2::Params::MIN_M_COST);
    }
}
