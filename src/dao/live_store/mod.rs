//! Abstraction over the persistence layer for the live scoring documents.

pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{FinalSnapshotEntity, GameEventEntity, GameStateEntity},
    storage::StorageResult,
};

/// Persistence operations the live layer needs, implemented per backend.
pub trait LiveStore: Send + Sync {
    /// Upsert the state row for a game.
    fn save_state(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Append one event to a game's persisted log.
    fn append_event(&self, event: GameEventEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete one event from a game's persisted log.
    fn delete_event(&self, game_id: Uuid, event_id: Uuid)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Load the state row for a game, if any.
    fn find_state(&self, game_id: Uuid)
    -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>>;
    /// Load a game's full event log ordered by creation time.
    fn load_events(&self, game_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<GameEventEntity>>>;
    /// List all persisted state rows.
    fn list_states(&self) -> BoxFuture<'static, StorageResult<Vec<GameStateEntity>>>;
    /// Hand the final snapshot to the durable sink collection.
    fn save_final_snapshot(
        &self,
        snapshot: FinalSnapshotEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap liveness probe against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
