//! Presence operations and the background TTL sweeper.

use std::time::SystemTime;

use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dto::presence::{HeartbeatResponse, JoinGameRequest, PresenceEntryView, PresenceListResponse},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, presence::PresenceKey},
};

/// Announce a session on a game. Re-joining with the same client id refreshes
/// the existing record instead of adding a second one.
pub async fn join(
    state: &SharedState,
    game_id: Uuid,
    request: JoinGameRequest,
    actor: &str,
) -> Result<PresenceListResponse, ServiceError> {
    state.require_game(game_id)?;

    let key = PresenceKey {
        game_id,
        user_id: actor.to_string(),
        client_id: request.client_id,
    };
    state.presence().join(key, request.role, SystemTime::now());

    let response = roster(state, game_id);
    sse_events::broadcast_presence_changed(state.streams(), game_id, response.viewers.clone());
    Ok(response)
}

/// Refresh a session's freshness.
///
/// Responds with `active: false` when the record already expired, telling the
/// client to re-join.
pub async fn heartbeat(
    state: &SharedState,
    game_id: Uuid,
    client_id: String,
    actor: &str,
) -> Result<HeartbeatResponse, ServiceError> {
    state.require_game(game_id)?;

    let key = PresenceKey {
        game_id,
        user_id: actor.to_string(),
        client_id,
    };
    let active = state.presence().heartbeat(&key, SystemTime::now());
    Ok(HeartbeatResponse { active })
}

/// Drop every session the actor has open on a game.
pub async fn leave(
    state: &SharedState,
    game_id: Uuid,
    actor: &str,
) -> Result<PresenceListResponse, ServiceError> {
    state.require_game(game_id)?;

    let dropped = state.presence().leave(game_id, actor);
    let response = roster(state, game_id);
    if dropped > 0 {
        sse_events::broadcast_presence_changed(state.streams(), game_id, response.viewers.clone());
    }
    Ok(response)
}

/// Current viewer roster for a game.
pub async fn list(
    state: &SharedState,
    game_id: Uuid,
) -> Result<PresenceListResponse, ServiceError> {
    state.require_game(game_id)?;
    Ok(roster(state, game_id))
}

/// Periodically evict sessions whose last heartbeat is older than the TTL,
/// notifying the affected game streams.
pub async fn run_sweeper(state: SharedState) {
    let ttl = state.config().presence_ttl;
    let mut ticker = interval(state.config().presence_sweep_interval);
    info!(ttl_secs = ttl.as_secs(), "presence sweeper started");

    loop {
        ticker.tick().await;
        let touched = state.presence().sweep(ttl, SystemTime::now());
        for game_id in touched {
            debug!(%game_id, "presence records expired");
            let response = roster(&state, game_id);
            sse_events::broadcast_presence_changed(
                state.streams(),
                game_id,
                response.viewers,
            );
        }
    }
}

fn roster(state: &SharedState, game_id: Uuid) -> PresenceListResponse {
    let viewers: Vec<PresenceEntryView> = state
        .presence()
        .list(game_id)
        .into_iter()
        .map(Into::into)
        .collect();
    PresenceListResponse {
        count: viewers.len(),
        viewers,
    }
}
