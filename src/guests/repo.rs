use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::repo_types::Guest;

pub trait GuestRepository: Send + Sync {
    fn add(&self, guest: Guest) -> Guest;
    fn get_by_id(&self, id: Uuid) -> Option<Guest>;
    /// Ordered by email.
    fn get_by_event(&self, event_id: Uuid) -> Vec<Guest>;
    /// Replaces the whole record; `None` if it no longer exists.
    fn update(&self, guest: Guest) -> Option<Guest>;
    fn delete(&self, id: Uuid) -> bool;
    /// Returns how many guests were removed.
    fn delete_by_event(&self, event_id: Uuid) -> usize;
}

#[derive(Default)]
pub struct InMemoryGuestRepository {
    guests: RwLock<HashMap<Uuid, Guest>>,
}

impl InMemoryGuestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuestRepository for InMemoryGuestRepository {
    fn add(&self, guest: Guest) -> Guest {
        self.guests.write().insert(guest.id, guest.clone());
        guest
    }

    fn get_by_id(&self, id: Uuid) -> Option<Guest> {
        self.guests.read().get(&id).cloned()
    }

    fn get_by_event(&self, event_id: Uuid) -> Vec<Guest> {
        let mut out: Vec<Guest> = self
            .guests
            .read()
            .values()
            .filter(|g| g.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.email.cmp(&b.email));
        out
    }

    fn update(&self, guest: Guest) -> Option<Guest> {
        let mut guests = self.guests.write();
        let slot = guests.get_mut(&guest.id)?;
        *slot = guest.clone();
        Some(guest)
    }

    fn delete(&self, id: Uuid) -> bool {
        self.guests.write().remove(&id).is_some()
    }

    fn delete_by_event(&self, event_id: Uuid) -> usize {
        let mut guests = self.guests.write();
        let before = guests.len();
        guests.retain(|_, g| g.event_id != event_id);
        before - guests.len()
    }
}
