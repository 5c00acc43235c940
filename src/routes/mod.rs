use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod event;
pub mod game;
pub mod health;
pub mod presence;
pub mod sse;
pub mod timer;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game::router())
        .merge(event::router())
        .merge(timer::router())
        .merge(presence::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
