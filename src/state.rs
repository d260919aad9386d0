use std::sync::Arc;

use crate::auth::{jwt::TokenService, repo::InMemoryUserRepository, services::Authenticator};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::events::{repo::InMemoryEventRepository, services::EventService};
use crate::guests::{repo::InMemoryGuestRepository, services::GuestService};

/// Everything a handler needs, wired once per process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<Authenticator>,
    pub events: Arc<EventService>,
    pub guests: Arc<GuestService>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        if config.uses_dev_secret() {
            tracing::warn!("tokens are signed with the development secret; set JWT_SECRET");
        }
        Ok(Self::new(config, Arc::new(SystemClock)))
    }

    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let events = Arc::new(InMemoryEventRepository::new());
        let guests = Arc::new(InMemoryGuestRepository::new());

        let tokens = Arc::new(TokenService::new(&config.jwt, clock.clone()));
        let auth = Arc::new(Authenticator::new(users, tokens.clone(), clock.clone()));
        let event_service = Arc::new(EventService::new(
            events.clone(),
            guests.clone(),
            clock.clone(),
        ));
        let guest_service = Arc::new(GuestService::new(events, guests, clock));

        Self {
            config: Arc::new(config),
            tokens,
            auth,
            events: event_service,
            guests: guest_service,
        }
    }

    /// Fresh state on the system clock with default config.
    pub fn fake() -> Self {
        Self::new(AppConfig::default(), Arc::new(SystemClock))
    }
}
