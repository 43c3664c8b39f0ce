/// Player colour table.
pub mod catalog;
/// Per-guild match model.
pub mod match_state;
/// Game phase machine.
pub mod phase;
/// Bound status message record.
pub mod status_message;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    config::AppConfig,
    platform::MessagingPlatform,
    services::{
        edit_dispatcher::EditDispatcher,
        localization::{Localizer, MessageCatalog},
        metrics::RequestCounters,
        renderer::RenderContext,
    },
    state::match_state::MatchState,
};

/// Shared handle passed to every handler and service.
pub type SharedState = Arc<AppState>;
/// Lock-protected handle to one tracked match.
pub type MatchHandle = Arc<Mutex<MatchState>>;
/// Held while a guild's status message is started, synced, recreated or ended.
pub type LifecycleGuard = OwnedMutexGuard<()>;

/// Central application state: tracked matches and the collaborators that render and sync them.
pub struct AppState {
    config: AppConfig,
    platform: Arc<dyn MessagingPlatform>,
    localizer: Arc<dyn Localizer>,
    counters: Arc<RequestCounters>,
    dispatcher: EditDispatcher,
    matches: DashMap<String, MatchHandle>,
    lifecycles: DashMap<String, Arc<Mutex<()>>>,
    api_token: Option<String>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        platform: Arc<dyn MessagingPlatform>,
        api_token: Option<String>,
    ) -> SharedState {
        let localizer = Arc::new(MessageCatalog::new(config.messages().clone()));
        let dispatcher = EditDispatcher::new(Arc::clone(&platform), config.edit_debounce());
        Arc::new(Self {
            config,
            platform,
            localizer,
            counters: Arc::new(RequestCounters::new()),
            dispatcher,
            matches: DashMap::new(),
            lifecycles: DashMap::new(),
            api_token: api_token.filter(|token| !token.is_empty()),
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Messaging platform used for every send, edit and delete.
    pub fn platform(&self) -> &Arc<dyn MessagingPlatform> {
        &self.platform
    }

    /// Message catalog used for rendering.
    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Platform request counters.
    pub fn counters(&self) -> &Arc<RequestCounters> {
        &self.counters
    }

    /// Coalescing edit queue.
    pub fn dispatcher(&self) -> &EditDispatcher {
        &self.dispatcher
    }

    /// Token required on match routes, if any.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Render context stamped with the current time.
    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext::new(self.localizer(), self.config.delete_summary_minutes())
    }

    /// Handle of a tracked match.
    pub fn match_handle(&self, guild_id: &str) -> Option<MatchHandle> {
        self.matches
            .get(guild_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Handle of a tracked match, creating a fresh one when absent.
    pub fn match_or_insert(&self, guild_id: &str) -> MatchHandle {
        let entry = self
            .matches
            .entry(guild_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(MatchState::new(guild_id))));
        Arc::clone(entry.value())
    }

    /// Stop tracking a match and return its handle.
    pub fn remove_match(&self, guild_id: &str) -> Option<MatchHandle> {
        self.matches.remove(guild_id).map(|(_, handle)| handle)
    }

    /// Serialize status-message lifecycle work for a guild.
    ///
    /// Starting, syncing, recreating and ending hold the guard for their whole
    /// run. The lock outlives the match and is reused when the guild starts again.
    pub async fn lock_lifecycle(&self, guild_id: &str) -> LifecycleGuard {
        let lock = Arc::clone(
            self.lifecycles
                .entry(guild_id.to_string())
                .or_default()
                .value(),
        );
        lock.lock_owned().await
    }

    /// Number of tracked matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}
