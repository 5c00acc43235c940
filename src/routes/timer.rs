use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::ActorId,
    dto::game::{TimerControlRequest, TimerStateView},
    error::AppError,
    services::timer_service,
    state::SharedState,
};

/// Routes controlling the game clock.
pub fn router() -> Router<SharedState> {
    Router::new().route("/games/{id}/timer", post(control_timer).get(get_timer))
}

/// Start or stop the clock.
#[utoipa::path(
    post,
    path = "/games/{id}/timer",
    tag = "timer",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = TimerControlRequest,
    responses(
        (status = 200, description = "Timer snapshot after the transition", body = TimerStateView),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Transition attempted from the wrong state")
    )
)]
pub async fn control_timer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    actor: ActorId,
    Json(payload): Json<TimerControlRequest>,
) -> Result<Json<TimerStateView>, AppError> {
    let view = timer_service::control(&state, id, payload, actor.as_str()).await?;
    Ok(Json(view))
}

/// Timer snapshot with the remaining time derived at read time.
#[utoipa::path(
    get,
    path = "/games/{id}/timer",
    tag = "timer",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Timer snapshot", body = TimerStateView),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_timer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerStateView>, AppError> {
    let view = timer_service::get(&state, id).await?;
    Ok(Json(view))
}
