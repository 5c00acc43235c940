//! Clock control: explicit start/stop transitions over the derived timer.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dto::game::{TimerAction, TimerControlRequest, TimerStateView},
    error::ServiceError,
    services::{game_service, sse_events},
    state::SharedState,
};

/// Apply a start or stop transition.
///
/// A transition from the wrong state (double start, double stop) is rejected,
/// so stacked start timestamps can never double-count elapsed time.
pub async fn control(
    state: &SharedState,
    game_id: Uuid,
    request: TimerControlRequest,
    actor: &str,
) -> Result<TimerStateView, ServiceError> {
    let handle = state.require_game(game_id)?;
    let now = SystemTime::now();

    let (event, view) = {
        let mut game = handle.write().await;
        if game.is_final() {
            return Err(ServiceError::InvalidState(
                "a finalized game has no running clock".into(),
            ));
        }

        let event = match request.action {
            TimerAction::Start => game.start_timer(request.clock_seconds, actor, now)?,
            TimerAction::Stop => game.stop_timer(request.clock_seconds, actor, now)?,
        };

        if let Some(store) = state.store().await {
            if let Err(err) = store.append_event((game_id, &event).into()).await {
                tracing::warn!(%game_id, error = %err, "failed to persist clock event");
            }
        }
        game_service::persist_state(state, (&*game).into()).await;
        (event, TimerStateView::snapshot(&game, now))
    };

    tracing::debug!(%game_id, event_type = ?event.event_type, "clock transition applied");
    sse_events::broadcast_timer_changed(state.streams(), game_id, view.clone());
    Ok(view)
}

/// Timer snapshot with the remaining time derived at read time.
pub async fn get(state: &SharedState, game_id: Uuid) -> Result<TimerStateView, ServiceError> {
    let handle = state.require_game(game_id)?;
    let game = handle.read().await;
    Ok(TimerStateView::snapshot(&game, SystemTime::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::game::CreateGameRequest,
        services::game_service,
        state::AppState,
    };

    async fn seeded_game(state: &SharedState) -> Uuid {
        let view = game_service::create_game(
            state,
            CreateGameRequest {
                home_name: "Hornets".into(),
                guest_name: "Pioneers".into(),
                clock_seconds: Some(600),
                timeouts_per_side: None,
            },
            "scorer-1",
        )
        .await
        .unwrap();
        view.game_id
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let game_id = seeded_game(&state).await;

        let started = control(
            &state,
            game_id,
            TimerControlRequest {
                action: TimerAction::Start,
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await
        .unwrap();
        assert!(started.is_running);

        let again = control(
            &state,
            game_id,
            TimerControlRequest {
                action: TimerAction::Start,
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await;
        assert!(matches!(again, Err(ServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn stop_checkpoints_and_logs_the_transition() {
        let state = AppState::new(AppConfig::default());
        let game_id = seeded_game(&state).await;

        control(
            &state,
            game_id,
            TimerControlRequest {
                action: TimerAction::Start,
                clock_seconds: None,
            },
            "scorer-1",
        )
        .await
        .unwrap();

        let stopped = control(
            &state,
            game_id,
            TimerControlRequest {
                action: TimerAction::Stop,
                clock_seconds: Some(480),
            },
            "scorer-1",
        )
        .await
        .unwrap();
        assert!(!stopped.is_running);
        assert_eq!(stopped.current_clock_seconds, 480);

        let events = crate::services::event_service::list_events(&state, game_id, None)
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
    }
}
