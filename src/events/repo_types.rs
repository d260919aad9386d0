use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_utc: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_utc: OffsetDateTime,
    pub timezone: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Event {
    /// Half-open interval overlap. Not enforced on create or update.
    pub fn is_overlapping(&self, other: &Event) -> bool {
        self.start_utc < other.end_utc && other.start_utc < self.end_utc
    }
}

/// Caller-supplied fields of an event, used for both create and full update.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_utc: OffsetDateTime,
    pub end_utc: OffsetDateTime,
    pub timezone: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
}

impl EventDraft {
    pub fn has_valid_range(&self) -> bool {
        self.end_utc > self.start_utc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ev(start: OffsetDateTime, end: OffsetDateTime) -> Event {
        Event {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::new_v4(),
            title: "t".into(),
            description: None,
            start_utc: start,
            end_utc: end,
            timezone: "UTC".into(),
            location: None,
            capacity: None,
            created_at: start,
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let a = ev(datetime!(2026-03-01 10:00 UTC), datetime!(2026-03-01 11:00 UTC));
        let b = ev(datetime!(2026-03-01 10:30 UTC), datetime!(2026-03-01 12:00 UTC));
        let touching = ev(datetime!(2026-03-01 11:00 UTC), datetime!(2026-03-01 12:00 UTC));
        let inside = ev(datetime!(2026-03-01 10:15 UTC), datetime!(2026-03-01 10:45 UTC));

        assert!(a.is_overlapping(&b) && b.is_overlapping(&a));
        assert!(a.is_overlapping(&inside));
        assert!(!a.is_overlapping(&touching));
        assert!(!touching.is_overlapping(&a));
    }
}
