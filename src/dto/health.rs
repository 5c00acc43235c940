//! Healthcheck payloads.

use serde::Serialize;
use utoipa::ToSchema;

/// Healthcheck response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status, `ok` or `degraded`.
    pub status: &'static str,
    /// Whether the storage backend is reachable.
    pub storage: bool,
    /// Number of games currently held in the live registry.
    pub live_games: usize,
}
