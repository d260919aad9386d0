use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::GuestRepository,
    repo_types::{Guest, RsvpStatus},
};
use crate::{
    auth::guard::ensure_owner,
    clock::Clock,
    error::AppError,
    events::{repo::EventRepository, repo_types::Event},
};

/// Invitations and RSVP. A guest has no owner of its own; every operation is
/// authorized against the owner of its parent event.
pub struct GuestService {
    events: Arc<dyn EventRepository>,
    guests: Arc<dyn GuestRepository>,
    clock: Arc<dyn Clock>,
}

impl GuestService {
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

    fn owned_event(&self, caller_id: Uuid, event_id: Uuid) -> Result<Event, AppError> {
        let event = self.events.get_by_id(event_id).ok_or(AppError::NotFound)?;
        ensure_owner(event.owner_user_id, caller_id)?;
        Ok(event)
    }

    /// Looks up a guest of `event_id` the caller is allowed to mutate.
    fn owned_guest(&self, caller_id: Uuid, event_id: Uuid, guest_id: Uuid) -> Result<Guest, AppError> {
        let guest = self
            .guests
            .get_by_id(guest_id)
            .filter(|g| g.event_id == event_id)
            .ok_or(AppError::NotFound)?;
        self.owned_event(caller_id, guest.event_id)?;
        Ok(guest)
    }

    pub fn invite(
        &self,
        caller_id: Uuid,
        event_id: Uuid,
        email: &str,
        name: Option<String>,
    ) -> Result<Guest, AppError> {
        self.owned_event(caller_id, event_id)?;
        let guest = self.guests.add(Guest::invite(
            event_id,
            email.trim().to_string(),
            name,
            self.clock.now(),
        ));

        // The event may have been deleted, and its guests cascaded, since the check above.
        if self.events.get_by_id(event_id).is_none() {
            self.guests.delete(guest.id);
            warn!(guest_id = %guest.id, %event_id, "event deleted during invite");
            return Err(AppError::NotFound);
        }
        info!(guest_id = %guest.id, %event_id, "guest invited");
        Ok(guest)
    }

    pub fn list_by_event(&self, caller_id: Uuid, event_id: Uuid) -> Result<Vec<Guest>, AppError> {
        self.owned_event(caller_id, event_id)?;
        Ok(self.guests.get_by_event(event_id))
    }

    pub fn update_status(
        &self,
        caller_id: Uuid,
        event_id: Uuid,
        guest_id: Uuid,
        status: RsvpStatus,
    ) -> Result<Guest, AppError> {
        let mut guest = self.owned_guest(caller_id, event_id, guest_id)?;
        guest.respond(status, self.clock.now());
        let guest = self.guests.update(guest).ok_or(AppError::NotFound)?;
        info!(%guest_id, status = %guest.status, "guest status updated");
        Ok(guest)
    }

    pub fn remove(&self, caller_id: Uuid, event_id: Uuid, guest_id: Uuid) -> Result<(), AppError> {
        self.owned_guest(caller_id, event_id, guest_id)?;
        if !self.guests.delete(guest_id) {
            return Err(AppError::NotFound);
        }
        info!(%guest_id, %event_id, "guest removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        events::{repo::InMemoryEventRepository, repo_types::Event},
        guests::repo::InMemoryGuestRepository,
    };
    use time::{macros::datetime, Duration};

    struct Fixture {
        svc: GuestService,
        clock: Arc<ManualClock>,
        owner: Uuid,
        event: Event,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(datetime!(2026-03-01 08:00 UTC)));
        let events = Arc::new(InMemoryEventRepository::new());
        let owner = Uuid::new_v4();
        let event = events.add(Event {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            title: "Launch".into(),
            description: None,
            start_utc: datetime!(2026-03-01 10:00 UTC),
            end_utc: datetime!(2026-03-01 11:00 UTC),
            timezone: "UTC".into(),
            location: None,
            capacity: None,
            created_at: datetime!(2026-03-01 08:00 UTC),
        });
        let svc = GuestService::new(
            events,
            Arc::new(InMemoryGuestRepository::new()),
            clock.clone(),
        );
        Fixture {
            svc,
            clock,
            owner,
            event,
        }
    }

    #[test]
    fn invite_is_pending_without_response() {
        let f = fixture();
        let g = f
            .svc
            .invite(f.owner, f.event.id, "guest@x.com", Some("Guest".into()))
            .unwrap();
        assert_eq!(g.status, RsvpStatus::Pending);
        assert!(g.responded_at.is_none());
        assert_eq!(g.invited_at, datetime!(2026-03-01 08:00 UTC));
    }

    #[test]
    fn status_updates_overwrite_and_stamp() {
        let f = fixture();
        let g = f.svc.invite(f.owner, f.event.id, "guest@x.com", None).unwrap();

        f.clock.advance(Duration::minutes(5));
        let accepted = f
            .svc
            .update_status(f.owner, f.event.id, g.id, RsvpStatus::Accepted)
            .unwrap();
        assert_eq!(accepted.status, RsvpStatus::Accepted);
        assert_eq!(accepted.responded_at, Some(datetime!(2026-03-01 08:05 UTC)));

        f.clock.advance(Duration::minutes(5));
        let declined = f
            .svc
            .update_status(f.owner, f.event.id, g.id, RsvpStatus::Declined)
            .unwrap();
        assert_eq!(declined.status, RsvpStatus::Declined);
        assert_eq!(declined.responded_at, Some(datetime!(2026-03-01 08:10 UTC)));
    }

    #[test]
    fn non_owner_is_rejected_and_guest_unchanged() {
        let f = fixture();
        let intruder = Uuid::new_v4();
        let g = f.svc.invite(f.owner, f.event.id, "guest@x.com", None).unwrap();

        assert!(matches!(
            f.svc.invite(intruder, f.event.id, "x@x.com", None),
            Err(AppError::NotOwner)
        ));
        assert!(matches!(
            f.svc.list_by_event(intruder, f.event.id),
            Err(AppError::NotOwner)
        ));
        assert!(matches!(
            f.svc.update_status(intruder, f.event.id, g.id, RsvpStatus::Accepted),
            Err(AppError::NotOwner)
        ));
        assert!(matches!(
            f.svc.remove(intruder, f.event.id, g.id),
            Err(AppError::NotOwner)
        ));

        let stored = f.svc.list_by_event(f.owner, f.event.id).unwrap();
        assert_eq!(stored, vec![g]);
    }

    #[test]
    fn unknown_or_mismatched_ids_are_not_found() {
        let f = fixture();
        let g = f.svc.invite(f.owner, f.event.id, "guest@x.com", None).unwrap();

        assert!(matches!(
            f.svc.invite(f.owner, Uuid::new_v4(), "x@x.com", None),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            f.svc.update_status(f.owner, f.event.id, Uuid::new_v4(), RsvpStatus::Accepted),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            f.svc.update_status(f.owner, Uuid::new_v4(), g.id, RsvpStatus::Accepted),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn remove_then_list() {
        let f = fixture();
        let b = f.svc.invite(f.owner, f.event.id, "b@x.com", None).unwrap();
        let a = f.svc.invite(f.owner, f.event.id, "a@x.com", None).unwrap();

        let listed: Vec<_> = f
            .svc
            .list_by_event(f.owner, f.event.id)
            .unwrap()
            .into_iter()
            .map(|g| g.email)
            .collect();
        assert_eq!(listed, vec!["a@x.com", "b@x.com"]);

        f.svc.remove(f.owner, f.event.id, b.id).unwrap();
        assert_eq!(f.svc.list_by_event(f.owner, f.event.id).unwrap(), vec![a]);
        assert!(matches!(
            f.svc.remove(f.owner, f.event.id, b.id),
            Err(AppError::NotFound)
        ));
    }

    /// Serves one stale read of an already deleted event, then the live store.
    struct StaleOnceEvents {
        live: Arc<InMemoryEventRepository>,
        stale: parking_lot::Mutex<Option<Event>>,
    }

    impl EventRepository for StaleOnceEvents {
        fn add(&self, event: Event) -> Event {
            self.live.add(event)
        }

        fn get_by_id(&self, id: Uuid) -> Option<Event> {
            match self.stale.lock().take() {
                Some(e) if e.id == id => Some(e),
                _ => self.live.get_by_id(id),
            }
        }

        fn get_by_owner(&self, owner_user_id: Uuid) -> Vec<Event> {
            self.live.get_by_owner(owner_user_id)
        }

        fn get_all(&self) -> Vec<Event> {
            self.live.get_all()
        }

        fn update(&self, event: Event) -> Option<Event> {
            self.live.update(event)
        }

        fn delete(&self, id: Uuid) -> bool {
            self.live.delete(id)
        }
    }

    #[test]
    fn invite_racing_event_delete_leaves_no_orphan() {
        use crate::events::{repo_types::EventDraft, services::EventService};

        let clock = Arc::new(ManualClock::new(datetime!(2026-03-01 08:00 UTC)));
        let live = Arc::new(InMemoryEventRepository::new());
        let guests = Arc::new(InMemoryGuestRepository::new());
        let events_svc = EventService::new(live.clone(), guests.clone(), clock.clone());

        let owner = Uuid::new_v4();
        let event = events_svc
            .create(
                owner,
                EventDraft {
                    title: "Launch".into(),
                    description: None,
                    start_utc: datetime!(2026-03-01 10:00 UTC),
                    end_utc: datetime!(2026-03-01 11:00 UTC),
                    timezone: "UTC".into(),
                    location: None,
                    capacity: None,
                },
            )
            .unwrap();

        // Invite reads the event, then delete and its cascade run, then invite stores.
        let svc = GuestService::new(
            Arc::new(StaleOnceEvents {
                live: live.clone(),
                stale: parking_lot::Mutex::new(Some(event.clone())),
            }),
            guests.clone(),
            clock,
        );
        events_svc.delete(owner, event.id).unwrap();

        assert!(matches!(
            svc.invite(owner, event.id, "late@x.com", None),
            Err(AppError::NotFound)
        ));
        assert!(live.get_by_id(event.id).is_none());
        assert!(guests.get_by_event(event.id).is_empty());
    }

    #[test]
    fn concurrent_status_updates_never_mix_fields() {
        let events = Arc::new(InMemoryEventRepository::new());
        let guests = Arc::new(InMemoryGuestRepository::new());
        let owner = Uuid::new_v4();
        let event = events.add(Event {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            title: "Launch".into(),
            description: None,
            start_utc: datetime!(2026-03-01 10:00 UTC),
            end_utc: datetime!(2026-03-01 11:00 UTC),
            timezone: "UTC".into(),
            location: None,
            capacity: None,
            created_at: datetime!(2026-03-01 08:00 UTC),
        });
        let base = datetime!(2026-03-01 08:00 UTC);
        let seed = GuestService::new(
            events.clone(),
            guests.clone(),
            Arc::new(ManualClock::new(base)),
        );
        let guest = seed.invite(owner, event.id, "guest@x.com", None).unwrap();

        // Each writer pairs one status with one response time.
        let statuses = [RsvpStatus::Accepted, RsvpStatus::Declined, RsvpStatus::Pending];
        let pairs: Vec<_> = (0..6i64)
            .map(|i| (statuses[i as usize % 3], base + Duration::minutes(i + 1)))
            .collect();

        let writers: Vec<_> = pairs
            .iter()
            .copied()
            .map(|(status, at)| {
                let svc = GuestService::new(
                    events.clone(),
                    guests.clone(),
                    Arc::new(ManualClock::new(at)),
                );
                let (event_id, guest_id) = (event.id, guest.id);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        svc.update_status(owner, event_id, guest_id, status).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let guests = guests.clone();
            let pairs = pairs.clone();
            let guest_id = guest.id;
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let g = guests.get_by_id(guest_id).unwrap();
                    let seen = (g.status, g.responded_at);
                    assert!(
                        seen == (RsvpStatus::Pending, None)
                            || pairs.iter().any(|&(s, at)| seen == (s, Some(at))),
                        "torn guest record {seen:?}"
                    );
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        let last = guests.get_by_id(guest.id).unwrap();
        assert!(pairs
            .iter()
            .any(|&(s, at)| (last.status, last.responded_at) == (s, Some(at))));
        assert_eq!(last.email, "guest@x.com");
        assert_eq!(last.invited_at, base);
    }
}
