use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::ActorId,
    dto::game::{
        CreateGameRequest, FinalizeResponse, GameStateUpdateRequest, GameStateView, GameSummary,
        ListGamesQuery,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes handling the game lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}/state", get(get_state).patch(update_state))
        .route("/games/{id}/finalize", post(finalize_game))
        .route("/games/{id}/load", post(load_game))
}

/// Create a fresh game in the live registry.
#[utoipa::path(
    post,
    path = "/games",
    tag = "game",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameStateView),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing actor identity")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    actor: ActorId,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<GameStateView>, AppError> {
    payload.validate()?;
    let view = game_service::create_game(&state, payload, actor.as_str()).await?;
    Ok(Json(view))
}

/// List registered games, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/games",
    tag = "game",
    params(("status" = Option<String>, Query, description = "Restrict to games in this status")),
    responses((status = 200, description = "Game summaries, most recently touched first", body = [GameSummary]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<ListGamesQuery>,
) -> Json<Vec<GameSummary>> {
    Json(game_service::list_games(&state, query.status).await)
}

/// Current scoreboard snapshot with the clock derived at read time.
#[utoipa::path(
    get,
    path = "/games/{id}/state",
    tag = "game",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Scoreboard snapshot", body = GameStateView),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameStateView>, AppError> {
    let view = game_service::get_state(&state, id).await?;
    Ok(Json(view))
}

/// Apply a partial scalar update (possession arrow, status, clock correction).
#[utoipa::path(
    patch,
    path = "/games/{id}/state",
    tag = "game",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = GameStateUpdateRequest,
    responses(
        (status = 200, description = "Updated snapshot", body = GameStateView),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game is finalized or the clock is running")
    )
)]
pub async fn update_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
    Json(payload): Json<GameStateUpdateRequest>,
) -> Result<Json<GameStateView>, AppError> {
    let view = game_service::update_state(&state, id, payload, actor.as_str()).await?;
    Ok(Json(view))
}

/// Close a game and hand the final snapshot to the durable sink.
#[utoipa::path(
    post,
    path = "/games/{id}/finalize",
    tag = "game",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game finalized", body = FinalizeResponse),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game is already finalized"),
        (status = 503, description = "Storage unavailable; finalization refused")
    )
)]
pub async fn finalize_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
) -> Result<Json<FinalizeResponse>, AppError> {
    let response = game_service::finalize_game(&state, id, actor.as_str()).await?;
    Ok(Json(response))
}

/// Rehydrate a persisted game into the live registry.
#[utoipa::path(
    post,
    path = "/games/{id}/load",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the game to load")),
    responses(
        (status = 200, description = "Game loaded", body = GameStateView),
        (status = 404, description = "No persisted game with this identifier"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn load_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameStateView>, AppError> {
    let view = game_service::load_game(&state, id).await?;
    Ok(Json(view))
}
