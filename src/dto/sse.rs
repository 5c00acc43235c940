//! Server-sent event envelope and typed payloads pushed to game streams.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    event::GameEventView,
    game::{GameStateView, TimerStateView},
    presence::PresenceEntryView,
};

/// A single server-sent event as pushed on a game stream.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServerEvent {
    /// Event name, mapped to the SSE `event:` field.
    pub event: Option<String>,
    /// JSON payload, mapped to the SSE `data:` field.
    pub data: String,
}

impl ServerEvent {
    /// Build a named event carrying a serialized JSON payload.
    ///
    /// Serialization failures degrade to a `null` payload rather than
    /// dropping the notification.
    pub fn json<T: Serialize>(name: &str, payload: &T) -> Self {
        Self {
            event: Some(name.to_string()),
            data: serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string()),
        }
    }
}

/// Payload of `state.updated` events: the full scoreboard snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateUpdatedPayload {
    /// Snapshot after the mutation.
    pub state: GameStateView,
}

/// Payload of `event.added` events.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventAddedPayload {
    /// The appended entry.
    pub event: GameEventView,
    /// Snapshot after the fold.
    pub state: GameStateView,
}

/// Payload of `event.deleted` events.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDeletedPayload {
    /// Identifier of the removed entry.
    pub event_id: Uuid,
    /// Snapshot after the replay.
    pub state: GameStateView,
}

/// Payload of `timer.changed` events.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimerChangedPayload {
    /// Timer snapshot after the transition.
    pub timer: TimerStateView,
}

/// Payload of `presence.changed` events.
#[derive(Debug, Serialize, ToSchema)]
pub struct PresenceChangedPayload {
    /// Number of sessions on the game.
    pub count: usize,
    /// The sessions themselves.
    pub viewers: Vec<PresenceEntryView>,
}

/// Payload of `game.finalized` events.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameFinalizedPayload {
    /// Game identifier.
    pub game_id: Uuid,
    /// Final home points.
    pub home_score: u32,
    /// Final guest points.
    pub guest_score: u32,
}
