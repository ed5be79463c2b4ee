// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Opaque bearer token issuance and resolution.
//!
//! A token is 32 random bytes, URL-safe base64 encoded. The database only
//! ever sees the hex SHA-256 of that string, so a leaked `tokens` table
//! cannot be replayed.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Scope, Token, User};
use crate::time_utils::to_micros;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

/// Random bytes per token before encoding.
pub const TOKEN_BYTES: usize = 32;

/// SHA-256 of the token's plaintext form.
pub fn hash_token(plaintext: &str) -> [u8; 32] {
    Sha256::digest(plaintext.as_bytes()).into()
}

/// Issues tokens and resolves presented tokens back to users.
#[derive(Clone)]
pub struct TokenIssuer {
    db: Database,
    rng: SystemRandom,
}

impl TokenIssuer {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            rng: SystemRandom::new(),
        }
    }

    /// Build a token without storing it.
    pub fn generate(&self, user_id: i64, ttl: Duration, scope: Scope) -> Result<Token, AppError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG unavailable")))?;

        let expires_at = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("token expiry out of range: {}", ttl))
        })?;

        let plaintext = URL_SAFE_NO_PAD.encode(bytes);
        let hash = hash_token(&plaintext);

        Ok(Token {
            plaintext,
            hash,
            user_id,
            scope,
            expires_at,
        })
    }

    /// Create and store a token for `user_id`. Returns the plaintext, which
    /// is never stored and must not be logged.
    pub async fn issue(&self, user_id: i64, ttl: Duration, scope: Scope) -> Result<String, AppError> {
        let token = self.generate(user_id, ttl, scope)?;
        self.db.insert_token(&token).await?;

        tracing::info!(
            user_id,
            scope = %scope,
            expires_at = %token.expires_at,
            "Issued token"
        );
        Ok(token.plaintext)
    }

    /// Resolve a presented token to its owner. Unknown, wrong-scope and
    /// expired tokens all resolve to `None`.
    pub async fn resolve(&self, scope: Scope, plaintext: &str) -> Result<Option<User>, AppError> {
        self.resolve_at(scope, plaintext, Utc::now()).await
    }

    /// [`resolve`](Self::resolve) against an explicit clock reading.
    pub async fn resolve_at(
        &self,
        scope: Scope,
        plaintext: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let hash = hex::encode(hash_token(plaintext));
        self.db
            .get_user_for_token(scope, hash, to_micros(now))
            .await
    }

    /// Delete tokens that have expired as of `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let removed = self.db.purge_expired_tokens(to_micros(now)).await?;
        if removed > 0 {
            tracing::info!(removed, "Purged expired tokens");
        }
        Ok(removed)
    }
}

/// Periodically purge expired tokens until the runtime shuts down.
pub fn spawn_reaper(issuer: TokenIssuer, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
    tracing::info!(interval_secs = every.as_secs(), "Starting expired-token reaper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = issuer.purge_expired(Utc::now()).await {
                tracing::warn!(error = %e, "Expired-token purge failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_and_not_the_plaintext() {
        let a = hash_token("abc");
        let b = hash_token("abc");
        let c = hash_token("abd");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            hex::encode(a),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_generate_produces_unique_url_safe_tokens() {
        let issuer = TokenIssuer::new(Database::open_in_memory().unwrap());

        let first = issuer.generate(1, Duration::hours(1), Scope::Auth).unwrap();
        let second = issuer.generate(1, Duration::hours(1), Scope::Auth).unwrap();

        assert_ne!(first.plaintext, second.plaintext);
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(first.plaintext.len(), 43);
        assert!(first
            .plaintext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(first.hash, hash_token(&first.plaintext));
        assert!(first.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_generate_rejects_unrepresentable_expiry() {
        let issuer = TokenIssuer::new(Database::open_in_memory().unwrap());
        let ttl = Duration::try_days(100_000_000).unwrap();

        let err = issuer.generate(1, ttl, Scope::Auth).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
