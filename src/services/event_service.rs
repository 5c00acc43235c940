//! Action log operations: append with deduplication, listing, and deletion
//! with replay.

use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::GameEventEntity,
    dto::{
        event::{AppendEventResponse, GameEventInput, GameEventView},
        game::GameStateView,
    },
    error::ServiceError,
    services::{game_service, sse_events},
    state::{SharedState, game::AppendOutcome},
};

/// Append an event to a game's log and fold it into the aggregate.
///
/// A resubmitted client key is answered with the original entry and
/// `deduplicated: true`; nothing is applied, persisted, or broadcast again.
pub async fn add_event(
    state: &SharedState,
    game_id: Uuid,
    input: GameEventInput,
    actor: &str,
) -> Result<AppendEventResponse, ServiceError> {
    let handle = state.require_game(game_id)?;
    let now = SystemTime::now();

    let (outcome, view) = {
        let mut game = handle.write().await;
        if game.is_final() {
            return Err(ServiceError::InvalidState(
                "a finalized game cannot record events".into(),
            ));
        }
        let outcome = game.record_event(input.into(), actor, now);
        let view = GameStateView::snapshot(&game, now);
        if let AppendOutcome::Applied(event) = &outcome {
            persist_event(state, (game_id, event).into()).await;
            game_service::persist_state(state, (&*game).into()).await;
        }
        (outcome, view)
    };

    match outcome {
        AppendOutcome::Applied(event) => {
            let event_view = GameEventView::from(&event);
            sse_events::broadcast_event_added(
                state.streams(),
                game_id,
                event_view.clone(),
                view,
            );
            Ok(AppendEventResponse {
                event: event_view,
                deduplicated: false,
            })
        }
        AppendOutcome::Duplicate(original) => Ok(AppendEventResponse {
            event: GameEventView::from(&original),
            deduplicated: true,
        }),
    }
}

/// Most recent log entries in chronological order, capped at `limit` (or the
/// configured default).
pub async fn list_events(
    state: &SharedState,
    game_id: Uuid,
    limit: Option<usize>,
) -> Result<Vec<GameEventView>, ServiceError> {
    let handle = state.require_game(game_id)?;
    let limit = limit.unwrap_or(state.config().event_query_limit);
    let game = handle.read().await;
    let skip = game.events.len().saturating_sub(limit);
    Ok(game.events[skip..].iter().map(Into::into).collect())
}

/// Remove one log entry and recompute the aggregate by replaying the rest.
pub async fn delete_event(
    state: &SharedState,
    game_id: Uuid,
    event_id: Uuid,
    actor: &str,
) -> Result<GameStateView, ServiceError> {
    let handle = state.require_game(game_id)?;
    let now = SystemTime::now();

    let view = {
        let mut game = handle.write().await;
        if game.is_final() {
            return Err(ServiceError::InvalidState(
                "a finalized game cannot be corrected".into(),
            ));
        }
        if game.delete_event(event_id, actor, now).is_none() {
            return Err(ServiceError::NotFound(format!(
                "event `{event_id}` not found on game `{game_id}`"
            )));
        }

        if let Some(store) = state.store().await {
            if let Err(err) = store.delete_event(game_id, event_id).await {
                warn!(%game_id, %event_id, error = %err, "failed to delete persisted event");
            }
        }
        game_service::persist_state(state, (&*game).into()).await;
        GameStateView::snapshot(&game, now)
    };

    sse_events::broadcast_event_deleted(state.streams(), game_id, event_id, view.clone());
    Ok(view)
}

/// Persist a log entry best-effort; the in-memory log stays authoritative
/// while the store is degraded.
async fn persist_event(state: &SharedState, entity: GameEventEntity) {
    let Some(store) = state.store().await else {
        return;
    };
    let game_id = entity.game_id;
    let event_id = entity.id;
    if let Err(err) = store.append_event(entity).await {
        warn!(%game_id, %event_id, error = %err, "failed to persist game event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::game::CreateGameRequest,
        services::game_service,
        state::{AppState, events::{EventType, Side}},
    };

    async fn seeded_game(state: &SharedState) -> Uuid {
        let view = game_service::create_game(
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

    fn score_input(value: i32, client_key: Option<&str>) -> GameEventInput {
        GameEventInput {
            client_key: client_key.map(Into::into),
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
    async fn append_and_dedup_through_the_service() {
        let state = AppState::new(AppConfig::default());
        let game_id = seeded_game(&state).await;

        let first = add_event(&state, game_id, score_input(2, Some("tap-1")), "scorer-1")
            .await
            .unwrap();
        assert!(!first.deduplicated);

        let retry = add_event(&state, game_id, score_input(2, Some("tap-1")), "scorer-1")
            .await
            .unwrap();
        assert!(retry.deduplicated);
        assert_eq!(retry.event.id, first.event.id);

        let events = list_events(&state, game_id, None).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn delete_replays_the_remaining_log() {
        let state = AppState::new(AppConfig::default());
        let game_id = seeded_game(&state).await;

        let two = add_event(&state, game_id, score_input(2, None), "scorer-1")
            .await
            .unwrap();
        add_event(&state, game_id, score_input(3, None), "scorer-1")
            .await
            .unwrap();

        let view = delete_event(&state, game_id, two.event.id, "scorer-1")
            .await
            .unwrap();
        assert_eq!(view.home_score, 3);
        assert_eq!(view.event_count, 1);
    }

    #[tokio::test]
    async fn unknown_game_is_reported() {
        let state = AppState::new(AppConfig::default());
        let missing = Uuid::new_v4();
        let result = add_event(&state, missing, score_input(2, None), "scorer-1").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
