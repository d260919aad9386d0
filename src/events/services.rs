use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::EventRepository,
    repo_types::{Event, EventDraft},
};
use crate::{auth::guard::ensure_owner, clock::Clock, error::AppError, guests::repo::GuestRepository};

pub struct EventService {
    events: Arc<dyn EventRepository>,
    guests: Arc<dyn GuestRepository>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        guests: Arc<dyn GuestRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            guests,
            clock,
        }
    }

    pub fn create(&self, owner_user_id: Uuid, draft: EventDraft) -> Result<Event, AppError> {
        if !draft.has_valid_range() {
            return Err(AppError::InvalidTimeRange);
        }
        let event = self.events.add(Event {
            id: Uuid::new_v4(),
            owner_user_id,
            title: draft.title,
            description: draft.description,
            start_utc: draft.start_utc,
            end_utc: draft.end_utc,
            timezone: draft.timezone,
            location: draft.location,
            capacity: draft.capacity,
            created_at: self.clock.now(),
        });
        info!(event_id = %event.id, %owner_user_id, "event created");
        Ok(event)
    }

    pub fn get(&self, id: Uuid) -> Result<Event, AppError> {
        self.events.get_by_id(id).ok_or(AppError::NotFound)
    }

    pub fn list_all(&self) -> Vec<Event> {
        self.events.get_all()
    }

    pub fn list_mine(&self, owner_user_id: Uuid) -> Vec<Event> {
        self.events.get_by_owner(owner_user_id)
    }

    /// Replaces every caller-editable field, or none of them.
    pub fn update(&self, caller_id: Uuid, id: Uuid, draft: EventDraft) -> Result<Event, AppError> {
        let existing = self.get(id)?;
        ensure_owner(existing.owner_user_id, caller_id)?;
        if !draft.has_valid_range() {
            warn!(event_id = %id, "update rejected: end not after start");
            return Err(AppError::InvalidTimeRange);
        }

        let updated = Event {
            title: draft.title,
            description: draft.description,
            start_utc: draft.start_utc,
            end_utc: draft.end_utc,
            timezone: draft.timezone,
            location: draft.location,
            capacity: draft.capacity,
            ..existing
        };
        self.events.update(updated).ok_or(AppError::NotFound)
    }

    /// Deleting an event also removes its guests.
    pub fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let existing = self.get(id)?;
        ensure_owner(existing.owner_user_id, caller_id)?;
        if !self.events.delete(id) {
            return Err(AppError::NotFound);
        }
        let removed = self.guests.delete_by_event(id);
        info!(event_id = %id, guests_removed = removed, "event deleted");
        Ok(())
    }
}
