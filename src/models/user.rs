// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User model for storage and API.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored password hash in PHC string format.
///
/// Only [`crate::services::CredentialVerifier`] produces or inspects the
/// contents; everything else treats it as opaque.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string read back from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub password_hash: PasswordHash,
    pub bio: String,
    pub created_at: String,
    pub updated_at: String,
}

/// User about to be inserted. Has no id yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub bio: String,
}

/// Who is making the current request.
///
/// `Anonymous` has no id and no store operation accepts it, so it can never
/// be persisted.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    User(User),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: PasswordHash::from_phc("$argon2id$v=19$secret"),
            bio: String::new(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
        assert!(!format!("{:?}", user).contains("secret"));
    }

    #[test]
    fn test_anonymous_is_not_a_user() {
        assert!(Identity::Anonymous.is_anonymous());
        assert!(!Identity::User(User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: PasswordHash::default(),
            bio: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        })
        .is_anonymous());
    }
}
