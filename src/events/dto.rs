use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Event, EventDraft};

fn default_timezone() -> String {
    "UTC".into()
}

/// Body of both `POST /events` and `PUT /events/:id`.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_utc: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_utc: OffsetDateTime,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
}

impl From<EventRequest> for EventDraft {
    fn from(r: EventRequest) -> Self {
        Self {
            title: r.title.trim().to_string(),
            description: r.description,
            start_utc: r.start_utc,
            end_utc: r.end_utc,
            timezone: r.timezone.trim().to_string(),
            location: r.location,
            capacity: r.capacity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_utc: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_utc: OffsetDateTime,
    pub timezone: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub owner_user_id: Uuid,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            description: e.description,
            start_utc: e.start_utc,
            end_utc: e.end_utc,
            timezone: e.timezone,
            location: e.location,
            capacity: e.capacity,
            owner_user_id: e.owner_user_id,
        }
    }
}
