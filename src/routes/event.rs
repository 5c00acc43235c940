use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::ActorId,
    dto::{
        event::{AppendEventResponse, GameEventInput, GameEventView, ListEventsQuery},
        game::GameStateView,
    },
    error::AppError,
    services::event_service,
    state::SharedState,
};

/// Routes handling the action log.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{id}/events", post(add_event).get(list_events))
        .route("/games/{id}/events/{event_id}", delete(delete_event))
}

/// Append an event to the game's action log.
#[utoipa::path(
    post,
    path = "/games/{id}/events",
    tag = "events",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = GameEventInput,
    responses(
        (status = 200, description = "Event applied, or original entry when deduplicated", body = AppendEventResponse),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game is finalized")
    )
)]
pub async fn add_event(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
    Json(payload): Json<GameEventInput>,
) -> Result<Json<AppendEventResponse>, AppError> {
    payload.validate()?;
    let response = event_service::add_event(&state, id, payload, actor.as_str()).await?;
    Ok(Json(response))
}

/// Most recent action log entries in chronological order.
#[utoipa::path(
    get,
    path = "/games/{id}/events",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Game identifier"),
        ("limit" = Option<usize>, Query, description = "Maximum number of most-recent entries")
    ),
    responses(
        (status = 200, description = "Log entries", body = [GameEventView]),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn list_events(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<GameEventView>>, AppError> {
    let events = event_service::list_events(&state, id, query.limit).await?;
    Ok(Json(events))
}

/// Remove one entry and recompute the aggregate by replay.
#[utoipa::path(
    delete,
    path = "/games/{id}/events/{event_id}",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Game identifier"),
        ("event_id" = Uuid, Path, description = "Entry to remove")
    ),
    responses(
        (status = 200, description = "Snapshot after replay", body = GameStateView),
        (status = 404, description = "Unknown game or entry"),
        (status = 409, description = "Game is finalized")
    )
)]
pub async fn delete_event(
    State(state): State<SharedState>,
    Path((id, event_id)): Path<(Uuid, Uuid)>,
    actor: ActorId,
) -> Result<Json<GameStateView>, AppError> {
    let view = event_service::delete_event(&state, id, event_id, actor.as_str()).await?;
    Ok(Json(view))
}
