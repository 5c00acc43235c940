use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::ActorId,
    dto::presence::{HeartbeatRequest, HeartbeatResponse, JoinGameRequest, PresenceListResponse},
    error::AppError,
    services::presence_service,
    state::SharedState,
};

/// Routes handling viewer presence.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{id}/presence", get(list_presence))
        .route("/games/{id}/presence/join", post(join_game))
        .route("/games/{id}/presence/heartbeat", post(heartbeat))
        .route("/games/{id}/presence/leave", post(leave_game))
}

/// Announce a session on a game.
#[utoipa::path(
    post,
    path = "/games/{id}/presence/join",
    tag = "presence",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = JoinGameRequest,
    responses(
        (status = 200, description = "Current viewer roster", body = PresenceListResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn join_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
    Json(payload): Json<JoinGameRequest>,
) -> Result<Json<PresenceListResponse>, AppError> {
    payload.validate()?;
    let response = presence_service::join(&state, id, payload, actor.as_str()).await?;
    Ok(Json(response))
}

/// Refresh a session's freshness.
#[utoipa::path(
    post,
    path = "/games/{id}/presence/heartbeat",
    tag = "presence",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = HeartbeatRequest,
    responses(
        (status = 200, description = "Whether the session is still active", body = HeartbeatResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn heartbeat(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
    Json(payload): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, AppError> {
    payload.validate()?;
    let response =
        presence_service::heartbeat(&state, id, payload.client_id, actor.as_str()).await?;
    Ok(Json(response))
}

/// Drop every session the actor has open on a game.
#[utoipa::path(
    post,
    path = "/games/{id}/presence/leave",
    tag = "presence",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Roster after departure", body = PresenceListResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn leave_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
) -> Result<Json<PresenceListResponse>, AppError> {
    let response = presence_service::leave(&state, id, actor.as_str()).await?;
    Ok(Json(response))
}

/// Current viewer roster.
#[utoipa::path(
    get,
    path = "/games/{id}/presence",
    tag = "presence",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Viewer roster", body = PresenceListResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn list_presence(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PresenceListResponse>, AppError> {
    let response = presence_service::list(&state, id).await?;
    Ok(Json(response))
}
