//! Salted password hashing with Argon2id.
//!
//! The salt is generated once per user and stored next to the derived hash as
//! `salt:hash`, both base64. Verification recomputes the hash and compares it
//! in constant time.

use std::fmt;
use std::str::FromStr;

use argon2::{password_hash::Output, Algorithm, Argon2, Params, Version};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::error;

const MEMORY_COST: u32 = 19456; // KiB
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
pub const OUTPUT_LEN: usize = 32;
pub const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password record")]
    InvalidRecord,
}

fn argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(password: &str, salt: &str) -> Result<[u8; OUTPUT_LEN], PasswordError> {
    let mut out = [0u8; OUTPUT_LEN];
    argon2()?
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password_into error");
            PasswordError::Hash(e.to_string())
        })?;
    Ok(out)
}

/// Fresh random salt, base64-encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    Base64::encode_string(&bytes)
}

/// Derives the base64 hash of `password` under `salt`.
pub fn hash(password: &str, salt: &str) -> Result<String, PasswordError> {
    Ok(Base64::encode_string(&derive(password, salt)?))
}

/// Returns `false` on mismatch and on any undecodable `expected`; never errors.
pub fn verify(password: &str, salt: &str, expected: &str) -> bool {
    let Ok(expected) = Base64::decode_vec(expected) else {
        return false;
    };
    let Ok(expected) = Output::new(&expected) else {
        return false;
    };
    let Ok(actual) = derive(password, salt) else {
        return false;
    };
    match Output::new(&actual) {
        // Output's PartialEq is constant-time.
        Ok(actual) => actual == expected,
        Err(_) => false,
    }
}

/// Stored credential: the per-user salt and the hash derived with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    pub salt: String,
    pub hash: String,
}

impl PasswordRecord {
    /// Hashes `password` under a freshly generated salt.
    pub fn create(password: &str) -> Result<Self, PasswordError> {
        let salt = generate_salt();
        let hash = hash(password, &salt)?;
        Ok(Self { salt, hash })
    }

    pub fn matches(&self, password: &str) -> bool {
        verify(password, &self.salt, &self.hash)
    }
}

impl fmt::Display for PasswordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.salt, self.hash)
    }
}

impl FromStr for PasswordRecord {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (salt, hash) = s.split_once(':').ok_or(PasswordError::InvalidRecord)?;
        if salt.is_empty() || hash.is_empty() || hash.contains(':') {
            return Err(PasswordError::InvalidRecord);
        }
        Ok(Self {
            salt: salt.to_string(),
            hash: hash.to_string(),
        })
    }
}
