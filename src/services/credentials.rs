// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing and verification (Argon2id, PHC strings).
//!
//! Every hash gets a fresh 16-byte salt from the system CSPRNG. The PHC
//! string records algorithm, version, cost and salt, so hashes made under an
//! older cost setting keep verifying after the configuration changes.

use crate::config::Config;
use crate::models::PasswordHash;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};

const SALT_BYTES: usize = 16;

/// Checked against when a login names an unknown user, so both paths cost
/// one verification.
const DUMMY_PASSWORD: &str = "not-a-real-password";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is corrupt: {0}")]
    CorruptHash(String),
}

/// Hashes and verifies user passwords.
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    rng: SystemRandom,
    dummy: PasswordHash,
}

impl CredentialVerifier {
    pub fn new(config: &Config) -> Result<Self, CredentialError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| CredentialError::Hashing(format!("invalid Argon2 parameters: {}", e)))?;

        let mut verifier = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            rng: SystemRandom::new(),
            dummy: PasswordHash::default(),
        };
        verifier.dummy = verifier.hash(DUMMY_PASSWORD)?;
        Ok(verifier)
    }

    /// Hash `plaintext` with a fresh salt.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        self.rng
            .fill(&mut salt_bytes)
            .map_err(|_| CredentialError::Hashing("system RNG unavailable".to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        let phc = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .to_string();

        Ok(PasswordHash::from_phc(phc))
    }

    /// Replace `hash` with a fresh hash of `plaintext`.
    pub fn set(&self, hash: &mut PasswordHash, plaintext: &str) -> Result<(), CredentialError> {
        *hash = self.hash(plaintext)?;
        Ok(())
    }

    /// Check `plaintext` against `hash`. A mismatch is `Ok(false)`; only an
    /// unparseable stored hash is an error.
    pub fn verify(&self, hash: &PasswordHash, plaintext: &str) -> Result<bool, CredentialError> {
        let parsed = password_hash::PasswordHash::new(hash.as_phc())
            .map_err(|e| CredentialError::CorruptHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::CorruptHash(e.to_string())),
        }
    }

    /// Spend one verification's worth of work and report no match.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(&self.dummy, plaintext);
        false
    }
}
