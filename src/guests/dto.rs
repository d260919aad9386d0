use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Guest, RsvpStatus};

#[derive(Debug, Deserialize)]
pub struct InviteGuestRequest {
    pub email: String,
    pub name: Option<String>,
}

/// Status arrives as a string and is checked against the canonical set by validation.
#[derive(Debug, Deserialize)]
pub struct UpdateGuestStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuestResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub status: RsvpStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub invited_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub responded_at: Option<OffsetDateTime>,
}

impl From<Guest> for GuestResponse {
    fn from(g: Guest) -> Self {
        Self {
            id: g.id,
            event_id: g.event_id,
            email: g.email,
            name: g.name,
            status: g.status,
            invited_at: g.invited_at,
            responded_at: g.responded_at,
        }
    }
}
