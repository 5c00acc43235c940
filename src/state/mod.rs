//! Shared application state: the live game registry, presence tracker,
//! per-game broadcast hubs, and the storage handle with its degraded flag.

pub mod clock;
pub mod events;
pub mod game;
pub mod presence;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::live_store::LiveStore,
    error::ServiceError,
    state::{game::LiveGame, presence::PresenceTracker},
};

pub use self::sse::GameStreams;

/// Cheaply-cloneable handle on the central application state.
pub type SharedState = Arc<AppState>;

/// Handle on one live game; mutations take the write half so the event
/// append and the aggregate fold always happen in one critical section.
pub type GameHandle = Arc<RwLock<LiveGame>>;

const STREAM_CHANNEL_CAPACITY: usize = 32;

/// Central application state storing live games and shared service handles.
pub struct AppState {
    config: AppConfig,
    store: RwLock<Option<Arc<dyn LiveStore>>>,
    games: DashMap<Uuid, GameHandle>,
    streams: GameStreams,
    presence: PresenceTracker,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            store: RwLock::new(None),
            games: DashMap::new(),
            streams: GameStreams::new(STREAM_CHANNEL_CAPACITY),
            presence: PresenceTracker::new(),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current live store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn LiveStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the live store or fail with a degraded-mode error.
    pub async fn require_store(&self) -> Result<Arc<dyn LiveStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn LiveStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Look up a live game handle by id.
    pub fn game(&self, game_id: Uuid) -> Option<GameHandle> {
        self.games.get(&game_id).map(|entry| entry.value().clone())
    }

    /// Look up a live game handle or fail with a not-found error.
    pub fn require_game(&self, game_id: Uuid) -> Result<GameHandle, ServiceError> {
        self.game(game_id)
            .ok_or_else(|| ServiceError::NotFound(format!("game `{game_id}` not found")))
    }

    /// Register a game in the live registry, returning its handle.
    pub fn insert_game(&self, game: LiveGame) -> GameHandle {
        let id = game.id;
        let handle = Arc::new(RwLock::new(game));
        self.games.insert(id, handle.clone());
        handle
    }

    /// Drop a game from the registry along with its stream hub and presence.
    pub fn remove_game(&self, game_id: Uuid) {
        self.games.remove(&game_id);
        self.streams.remove(game_id);
        self.presence.clear_game(game_id);
    }

    /// Snapshot of all registered game handles.
    pub fn games(&self) -> Vec<GameHandle> {
        self.games
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Per-game broadcast hubs used by the SSE streams.
    pub fn streams(&self) -> &GameStreams {
        &self.streams
    }

    /// Shared presence registry.
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }
}
