use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, services::sse_service, state::SharedState};

/// Configure the per-game stream endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/games/{id}/stream", get(game_stream))
}

#[utoipa::path(
    get,
    path = "/games/{id}/stream",
    tag = "sse",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Per-game SSE stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown game")
    )
)]
/// Stream realtime scoreboard notifications for one game.
pub async fn game_stream(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let receiver = sse_service::subscribe(&state, id)?;
    info!(game_id = %id, "new game stream connection");
    Ok(sse_service::to_sse_stream(receiver, id))
}
