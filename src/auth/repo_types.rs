use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // normalized (trimmed, lower-case)
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,      // `salt:hash`, never exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Canonical form used for uniqueness and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
