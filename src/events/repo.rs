use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::repo_types::Event;

pub trait EventRepository: Send + Sync {
    fn add(&self, event: Event) -> Event;
    fn get_by_id(&self, id: Uuid) -> Option<Event>;
    /// Newest start first.
    fn get_by_owner(&self, owner_user_id: Uuid) -> Vec<Event>;
    /// Newest start first.
    fn get_all(&self) -> Vec<Event>;
    /// Replaces the whole record; `None` if it no longer exists.
    fn update(&self, event: Event) -> Option<Event>;
    fn delete(&self, id: Uuid) -> bool;
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| b.start_utc.cmp(&a.start_utc));
    events
}

impl EventRepository for InMemoryEventRepository {
    fn add(&self, event: Event) -> Event {
        self.events.write().insert(event.id, event.clone());
        event
    }

    fn get_by_id(&self, id: Uuid) -> Option<Event> {
        self.events.read().get(&id).cloned()
    }

    fn get_by_owner(&self, owner_user_id: Uuid) -> Vec<Event> {
        let events = self
            .events
            .read()
            .values()
            .filter(|e| e.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        newest_first(events)
    }

    fn get_all(&self) -> Vec<Event> {
        newest_first(self.events.read().values().cloned().collect())
    }

    fn update(&self, event: Event) -> Option<Event> {
        let mut events = self.events.write();
        let slot = events.get_mut(&event.id)?;
        *slot = event.clone();
        Some(event)
    }

    fn delete(&self, id: Uuid) -> bool {
        self.events.write().remove(&id).is_some()
    }
}
