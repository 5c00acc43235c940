//! Action log payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::format_system_time;
use crate::state::{
    events::{EventType, GameEvent, Side},
    game::EventDraft,
};

/// Payload for appending an event to a game's action log.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GameEventInput {
    /// Client-generated deduplication key. Resubmitting the same key is a
    /// safe no-op that returns the original entry.
    #[validate(length(min = 1, max = 64))]
    pub client_key: Option<String>,
    /// Action to record.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Period the event happened in.
    #[validate(range(min = 1))]
    pub period: u8,
    /// Clock seconds remaining when the action happened.
    pub clock_at: u32,
    /// Bench concerned, when applicable.
    pub side: Option<Side>,
    /// Involved player display name.
    #[validate(length(min = 1, max = 80))]
    pub player: Option<String>,
    /// Roster reference in the durable system of record.
    #[validate(length(min = 1, max = 64))]
    pub roster_ref: Option<String>,
    /// Signed point/foul delta.
    pub value: Option<i32>,
    /// Human-readable summary.
    #[validate(length(min = 1, max = 200))]
    pub description: String,
}

impl From<GameEventInput> for EventDraft {
    fn from(input: GameEventInput) -> Self {
        Self {
            client_key: input.client_key,
            event_type: input.event_type,
            period: input.period,
            clock_at: input.clock_at,
            side: input.side,
            player: input.player,
            roster_ref: input.roster_ref,
            value: input.value,
            description: input.description,
        }
    }
}

/// One action log entry, as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameEventView {
    /// Entry identifier.
    pub id: Uuid,
    /// Deduplication key the client submitted, if any.
    pub client_key: Option<String>,
    /// Recorded action.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Period the event happened in.
    pub period: u8,
    /// Clock seconds remaining when the action happened.
    pub clock_at: u32,
    /// Bench concerned, when applicable.
    pub side: Option<Side>,
    /// Involved player display name.
    pub player: Option<String>,
    /// Roster reference in the durable system of record.
    pub roster_ref: Option<String>,
    /// Signed point/foul delta.
    pub value: Option<i32>,
    /// Human-readable summary.
    pub description: String,
    /// RFC 3339 insertion instant.
    pub created_at: String,
    /// Actor that recorded the event.
    pub created_by: String,
}

impl From<&GameEvent> for GameEventView {
    fn from(event: &GameEvent) -> Self {
        Self {
            id: event.id,
            client_key: event.client_key.clone(),
            event_type: event.event_type,
            period: event.period,
            clock_at: event.clock_at,
            side: event.side,
            player: event.player.clone(),
            roster_ref: event.roster_ref.clone(),
            value: event.value,
            description: event.description.clone(),
            created_at: format_system_time(event.created_at),
            created_by: event.created_by.clone(),
        }
    }
}

/// Response for an event append, flagging server-side deduplication.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppendEventResponse {
    /// The inserted entry, or the original one when deduplicated.
    pub event: GameEventView,
    /// `true` when the submission matched an already-recorded client key.
    pub deduplicated: bool,
}

/// Query parameters accepted by the event log listing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListEventsQuery {
    /// Maximum number of most-recent entries to return.
    pub limit: Option<usize>,
}
