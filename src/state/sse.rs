//! Per-game broadcast hubs behind the SSE streams.

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Registry of broadcast channels, one per game, created lazily.
pub struct GameStreams {
    hubs: DashMap<Uuid, broadcast::Sender<ServerEvent>>,
    capacity: usize,
}

impl GameStreams {
    /// Build the registry with a per-hub channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            hubs: DashMap::new(),
            capacity,
        }
    }

    /// Register a new subscriber on a game's hub.
    pub fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.hubs
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send an event to every subscriber of the game, ignoring delivery
    /// errors (a hub with no listeners simply drops the event).
    pub fn broadcast(&self, game_id: Uuid, event: ServerEvent) {
        if let Some(hub) = self.hubs.get(&game_id) {
            let _ = hub.send(event);
        }
    }

    /// Drop the hub once its game is gone, disconnecting remaining streams.
    pub fn remove(&self, game_id: Uuid) {
        self.hubs.remove(&game_id);
    }
}
