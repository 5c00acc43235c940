//! Liveness and degraded-mode reporting.

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the service status and whether storage is reachable.
pub async fn health(state: &SharedState) -> HealthResponse {
    let degraded = state.is_degraded().await;
    HealthResponse {
        status: if degraded { "degraded" } else { "ok" },
        storage: !degraded,
        live_games: state.games().len(),
    }
}
