//! Game lifecycle: creation, scalar state updates, listing, finalization, and
//! rehydration from storage.

use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::GameStateEntity,
    dto::game::{
        CreateGameRequest, FinalizeResponse, GameStateUpdateRequest, GameStateView, GameSummary,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::{GameStatus, LiveGame},
    },
};

/// Register a fresh game in the live registry.
///
/// The game is persisted best-effort; in degraded mode it still exists in
/// memory and can be scored.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
    actor: &str,
) -> Result<GameStateView, ServiceError> {
    let now = SystemTime::now();
    let config = state.config();

    let game = LiveGame::new(
        request.home_name.trim().to_string(),
        request.guest_name.trim().to_string(),
        request.clock_seconds.unwrap_or(config.period_seconds),
        request.timeouts_per_side.unwrap_or(config.timeouts_per_side),
        actor.to_string(),
        now,
    );
    if game.home_name.is_empty() || game.guest_name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "team names must not be empty".into(),
        ));
    }

    let view = GameStateView::snapshot(&game, now);
    persist_state(state, (&game).into()).await;
    state.insert_game(game);
    Ok(view)
}

/// Snapshot every registered game, optionally filtered by status, most
/// recently touched first.
pub async fn list_games(state: &SharedState, status: Option<GameStatus>) -> Vec<GameSummary> {
    let now = SystemTime::now();
    let mut entries = Vec::new();
    for handle in state.games() {
        let game = handle.read().await;
        if status.is_some_and(|wanted| game.status != wanted) {
            continue;
        }
        entries.push((game.updated_at, GameSummary::snapshot(&game, now)));
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries.into_iter().map(|(_, summary)| summary).collect()
}

/// Current scoreboard snapshot with the clock derived at read time.
pub async fn get_state(state: &SharedState, game_id: Uuid) -> Result<GameStateView, ServiceError> {
    let handle = state.require_game(game_id)?;
    let game = handle.read().await;
    Ok(GameStateView::snapshot(&game, SystemTime::now()))
}

/// Apply a partial scalar update (possession arrow, status, clock correction).
pub async fn update_state(
    state: &SharedState,
    game_id: Uuid,
    request: GameStateUpdateRequest,
    actor: &str,
) -> Result<GameStateView, ServiceError> {
    let handle = state.require_game(game_id)?;
    let now = SystemTime::now();

    let view = {
        let mut game = handle.write().await;
        if game.is_final() {
            return Err(ServiceError::InvalidState(
                "a finalized game cannot be updated".into(),
            ));
        }

        if let Some(possession) = request.possession {
            game.possession = possession;
        }
        match request.status {
            Some(GameStatus::Final) => {
                return Err(ServiceError::InvalidState(
                    "use the finalize operation to close a game".into(),
                ));
            }
            Some(status) => game.status = status,
            None => {}
        }
        if let Some(clock_seconds) = request.clock_seconds {
            if game.timer.is_running() {
                return Err(ServiceError::InvalidState(
                    "stop the clock before correcting it".into(),
                ));
            }
            game.timer = crate::state::clock::TimerState::stopped(clock_seconds);
        }
        game.touch(actor, now);

        persist_state(state, (&*game).into()).await;
        GameStateView::snapshot(&game, now)
    };

    sse_events::broadcast_state_updated(state.streams(), game_id, view.clone());
    Ok(view)
}

/// Close a game: stop the clock, mark it final, and hand the snapshot to the
/// durable sink.
///
/// Unlike live scoring, finalization requires the storage backend; the final
/// score must not be lost to a restart.
pub async fn finalize_game(
    state: &SharedState,
    game_id: Uuid,
    actor: &str,
) -> Result<FinalizeResponse, ServiceError> {
    let store = state.require_store().await?;
    let handle = state.require_game(game_id)?;
    let now = SystemTime::now();

    // The write lock is held across the snapshot write so the status flip and
    // the durable record cannot diverge: the game only becomes `Final` once
    // the sink accepted the snapshot, and a failed write leaves it retryable.
    let mut game = handle.write().await;
    if game.is_final() {
        // Final implies the snapshot reached the sink, so a retry can be
        // answered from the in-memory totals.
        return Ok(FinalizeResponse {
            game_id,
            home_score: game.totals.home.score,
            guest_score: game.totals.guest.score,
            periods_played: game.totals.current_period,
            finalized_at: crate::dto::format_system_time(game.updated_at),
        });
    }

    if game.timer.is_running() {
        // Ignoring the result: the running check above makes stop valid.
        let _ = game.stop_timer(None, actor, now);
    }

    let snapshot = game.final_snapshot(actor, now);
    store.save_final_snapshot(snapshot.clone()).await?;

    game.status = GameStatus::Final;
    game.touch(actor, now);
    let state_entity = GameStateEntity::from(&*game);
    let view = GameStateView::snapshot(&game, now);
    drop(game);

    persist_state(state, state_entity).await;

    sse_events::broadcast_state_updated(state.streams(), game_id, view);
    sse_events::broadcast_game_finalized(
        state.streams(),
        game_id,
        snapshot.home_score,
        snapshot.guest_score,
    );

    Ok(FinalizeResponse {
        game_id,
        home_score: snapshot.home_score,
        guest_score: snapshot.guest_score,
        periods_played: snapshot.periods_played,
        finalized_at: crate::dto::format_system_time(snapshot.finalized_at),
    })
}

/// Rehydrate a game from storage into the live registry.
///
/// The aggregate is recomputed from the persisted event log, so a stored row
/// that diverged from its log comes back corrected.
pub async fn load_game(state: &SharedState, game_id: Uuid) -> Result<GameStateView, ServiceError> {
    let store = state.require_store().await?;

    let Some(state_entity) = store.find_state(game_id).await? else {
        return Err(ServiceError::NotFound(format!("game `{game_id}` not found")));
    };
    let events = store.load_events(game_id).await?;

    let game = LiveGame::from_persisted(state_entity, events);
    let view = GameStateView::snapshot(&game, SystemTime::now());
    state.insert_game(game);
    Ok(view)
}

/// Bring persisted in-progress games back into the registry after a restart.
///
/// Games already registered are left alone; the in-memory copy is the
/// authoritative one.
pub async fn rehydrate_live_games(state: &SharedState) -> Result<usize, ServiceError> {
    let store = state.require_store().await?;
    let mut restored = 0;
    for entity in store.list_states().await? {
        if entity.status != GameStatus::Live || state.game(entity.id).is_some() {
            continue;
        }
        let events = store.load_events(entity.id).await?;
        state.insert_game(LiveGame::from_persisted(entity, events));
        restored += 1;
    }
    Ok(restored)
}

/// Persist the state row best-effort; a storage failure is logged but never
/// blocks live scoring.
pub async fn persist_state(state: &SharedState, entity: GameStateEntity) {
    let Some(store) = state.store().await else {
        return;
    };
    let game_id = entity.id;
    if let Err(err) = store.save_state(entity).await {
        warn!(%game_id, error = %err, "failed to persist game state");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Arc,
            atomic::{AtomicU32, Ordering},
        },
    };

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            live_store::LiveStore,
            models::{FinalSnapshotEntity, GameEventEntity},
            storage::{StorageError, StorageResult},
        },
        dto::{
            event::GameEventInput,
            game::{TimerAction, TimerControlRequest},
        },
        services::{event_service, timer_service},
        state::{
            AppState,
            events::{EventType, Side},
        },
    };

    /// In-memory store whose snapshot sink can be primed to fail.
    #[derive(Default)]
    struct StubStore {
        snapshot_failures: AtomicU32,
        snapshots_written: AtomicU32,
    }

    impl StubStore {
        fn failing_snapshots(failures: u32) -> Self {
            Self {
                snapshot_failures: AtomicU32::new(failures),
                snapshots_written: AtomicU32::new(0),
            }
        }

        fn offline() -> StorageError {
            StorageError::unavailable(
                "snapshot sink offline".into(),
                io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
            )
        }
    }

    impl LiveStore for StubStore {
        fn save_state(&self, _state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn append_event(&self, _event: GameEventEntity) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn delete_event(
            &self,
            _game_id: Uuid,
            _event_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn find_state(
            &self,
            _game_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>> {
            Box::pin(async { Ok(None) })
        }

        fn load_events(
            &self,
            _game_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Vec<GameEventEntity>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn list_states(&self) -> BoxFuture<'static, StorageResult<Vec<GameStateEntity>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn save_final_snapshot(
            &self,
            _snapshot: FinalSnapshotEntity,
        ) -> BoxFuture<'static, StorageResult<()>> {
            let failed = self
                .snapshot_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                    left.checked_sub(1)
                })
                .is_ok();
            if !failed {
                self.snapshots_written.fetch_add(1, Ordering::SeqCst);
            }
            Box::pin(async move {
                if failed {
                    Err(StubStore::offline())
                } else {
                    Ok(())
                }
            })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    async fn state_with_store(store: Arc<StubStore>) -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_store(store).await;
        state
    }

    async fn seeded_game(state: &SharedState) -> Uuid {
        let view = create_game(
            state,
            CreateGameRequest {
                home_name: "Hornets".into(),
                guest_name: "Pioneers".into(),
                clock_seconds: None,
                timeouts_per_side: None,
            },
            "scorer-1",
        )
        .await
        .unwrap();
        view.game_id
    }

    fn score_input(value: i32) -> GameEventInput {
        GameEventInput {
            client_key: None,
            event_type: EventType::Score,
            period: 1,
            clock_at: 540,
            side: Some(Side::Home),
            player: None,
            roster_ref: None,
            value: Some(value),
            description: format!("{value} points"),
        }
    }

    #[tokio::test]
    async fn finalize_writes_the_snapshot_and_closes_the_game() {
        let store = Arc::new(StubStore::default());
        let state = state_with_store(store.clone()).await;
        let game_id = seeded_game(&state).await;
        event_service::add_event(&state, game_id, score_input(2), "scorer-1")
            .await
            .unwrap();

        let response = finalize_game(&state, game_id, "scorer-1").await.unwrap();
        assert_eq!(response.home_score, 2);
        assert_eq!(store.snapshots_written.load(Ordering::SeqCst), 1);

        let view = get_state(&state, game_id).await.unwrap();
        assert_eq!(view.status, GameStatus::Final);
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_the_game_retryable() {
        let store = Arc::new(StubStore::failing_snapshots(1));
        let state = state_with_store(store.clone()).await;
        let game_id = seeded_game(&state).await;
        event_service::add_event(&state, game_id, score_input(3), "scorer-1")
            .await
            .unwrap();

        let first = finalize_game(&state, game_id, "scorer-1").await;
        assert!(matches!(first, Err(ServiceError::Unavailable(_))));

        // The failed write must not have flipped the status.
        let view = get_state(&state, game_id).await.unwrap();
        assert_eq!(view.status, GameStatus::Scheduled);

        let retry = finalize_game(&state, game_id, "scorer-1").await.unwrap();
        assert_eq!(retry.home_score, 3);
        assert_eq!(store.snapshots_written.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_finalize_is_answered_without_a_second_snapshot() {
        let store = Arc::new(StubStore::default());
        let state = state_with_store(store.clone()).await;
        let game_id = seeded_game(&state).await;

        let first = finalize_game(&state, game_id, "scorer-1").await.unwrap();
        let again = finalize_game(&state, game_id, "scorer-1").await.unwrap();
        assert_eq!(again.home_score, first.home_score);
        assert_eq!(again.guest_score, first.guest_score);
        assert_eq!(store.snapshots_written.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finalized_game_rejects_further_mutations() {
        let store = Arc::new(StubStore::default());
        let state = state_with_store(store).await;
        let game_id = seeded_game(&state).await;
        finalize_game(&state, game_id, "scorer-1").await.unwrap();

        let update = update_state(
            &state,
            game_id,
            GameStateUpdateRequest {
                possession: Some(Some(Side::Home)),
                status: None,
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await;
        assert!(matches!(update, Err(ServiceError::InvalidState(_))));

        let event = event_service::add_event(&state, game_id, score_input(2), "scorer-1").await;
        assert!(matches!(event, Err(ServiceError::InvalidState(_))));

        let timer = timer_service::control(
            &state,
            game_id,
            TimerControlRequest {
                action: TimerAction::Start,
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await;
        assert!(matches!(timer, Err(ServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn update_state_cannot_mark_a_game_final() {
        let state = AppState::new(AppConfig::default());
        let game_id = seeded_game(&state).await;

        let update = update_state(
            &state,
            game_id,
            GameStateUpdateRequest {
                possession: None,
                status: Some(GameStatus::Final),
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await;
        assert!(matches!(update, Err(ServiceError::InvalidState(_))));
    }
}
