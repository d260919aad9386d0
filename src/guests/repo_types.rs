use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// RSVP state. No state is terminal; a guest may move between any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RsvpStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "Pending",
            RsvpStatus::Accepted => "Accepted",
            RsvpStatus::Declined => "Declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for RsvpStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RsvpStatus::Pending),
            "Accepted" => Ok(RsvpStatus::Accepted),
            "Declined" => Ok(RsvpStatus::Declined),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
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

impl Guest {
    /// Fresh invitation: always Pending, never responded.
    pub fn invite(event_id: Uuid, email: String, name: Option<String>, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            email,
            name,
            status: RsvpStatus::Pending,
            invited_at: now,
            responded_at: None,
        }
    }

    /// Every transition, including to the current status, stamps `responded_at`.
    pub fn respond(&mut self, status: RsvpStatus, now: OffsetDateTime) {
        self.status = status;
        self.responded_at = Some(now);
    }
}
