//! Application state wiring the core and infra together.
//!
//! AppState pins the generic core types to their concrete infra
//! implementations and holds the live-session registry. Sessions exist
//! only here, in memory, for the lifetime of the process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use ease_core::bus::EventBus;
use ease_core::history::SessionService;
use ease_core::session::SessionController;
use ease_core::voice::VoiceTurnController;
use ease_infra::generator::CannedResponder;
use ease_infra::history::InMemorySessionHistory;
use ease_types::config::EaseConfig;

/// Event bus channel capacity.
const EVENT_CAPACITY: usize = 256;

/// The session controller pinned to the canned generator.
pub type ConcreteController = SessionController<Arc<CannedResponder>>;

/// One live session: the turn controller, its voice machine, and the
/// handles reachable without taking either lock -- the cancellation
/// token and the generator, so a pending turn can be discarded and
/// generation can run while the controller lock is free.
#[derive(Clone)]
pub struct SessionEntry {
    pub controller: Arc<Mutex<ConcreteController>>,
    pub voice: Arc<Mutex<VoiceTurnController>>,
    pub generator: Arc<CannedResponder>,
    pub cancel: CancellationToken,
    /// Opaque identity string from the auth collaborator.
    pub owner: String,
}

/// Shared application state for HTTP handlers and the CLI.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<DashMap<Uuid, SessionEntry>>,
    pub history: Arc<SessionService<InMemorySessionHistory>>,
    pub events: EventBus,
    pub config: EaseConfig,
}

impl AppState {
    /// Wire the state: seeded history store, shared event bus, empty
    /// session registry.
    pub fn new(config: EaseConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            history: Arc::new(SessionService::new(
                InMemorySessionHistory::with_samples(),
                config.clone(),
            )),
            events: EventBus::new(EVENT_CAPACITY),
            config,
        }
    }

    /// Create a fresh session for a user and register it.
    ///
    /// Returns the session id and its registry entry.
    pub fn create_session(&self, user_email: &str) -> (Uuid, SessionEntry) {
        let generator = Arc::new(CannedResponder::new(self.config.response_delay_ms));
        let controller = SessionController::new(
            user_email,
            generator.clone(),
            self.config.clone(),
            self.events.clone(),
        );
        let id = controller.id();
        let cancel = controller.cancel_token();
        let voice = VoiceTurnController::new(id, self.config.clone(), self.events.clone());

        let entry = SessionEntry {
            controller: Arc::new(Mutex::new(controller)),
            voice: Arc::new(Mutex::new(voice)),
            generator,
            cancel,
            owner: user_email.to_string(),
        };
        self.sessions.insert(id, entry.clone());
        (id, entry)
    }

    /// Look up a live session.
    pub fn session(&self, id: &Uuid) -> Option<SessionEntry> {
        self.sessions.get(id).map(|e| e.value().clone())
    }
}
