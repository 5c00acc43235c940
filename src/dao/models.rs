//! Storage-agnostic entities shared between the runtime state and the
//! database backends.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{
    events::{EventType, Side},
    game::GameStatus,
};

/// Live state row for one game, persisted on every mutation.
///
/// The numeric totals here are a cache of the event log fold; a reload always
/// replays the log rather than trusting them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateEntity {
    /// Identifier of the durable game record.
    pub id: Uuid,
    /// Home team display name.
    pub home_name: String,
    /// Guest team display name.
    pub guest_name: String,
    /// Home points.
    pub home_score: u32,
    /// Guest points.
    pub guest_score: u32,
    /// Home fouls in the current period.
    pub home_fouls: u32,
    /// Guest fouls in the current period.
    pub guest_fouls: u32,
    /// Home timeouts left.
    pub home_timeouts: u32,
    /// Guest timeouts left.
    pub guest_timeouts: u32,
    /// Clock checkpoint in seconds; authoritative only while stopped.
    pub clock_seconds: u32,
    /// Whether the clock is counting down.
    pub is_timer_running: bool,
    /// Start timestamp, present only while running.
    pub timer_started_at: Option<SystemTime>,
    /// Period currently being played.
    pub current_period: u8,
    /// Bench in possession.
    pub possession: Option<Side>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Timeout budget used when replaying the log.
    pub timeouts_per_side: u32,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
    /// Actor behind the last mutation.
    pub updated_by: String,
}

/// One persisted entry of a game's append-only event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEventEntity {
    /// Durable event identifier.
    pub id: Uuid,
    /// Game the event belongs to.
    pub game_id: Uuid,
    /// Client-generated deduplication key.
    pub client_key: Option<String>,
    /// Recorded action.
    pub event_type: EventType,
    /// Period the event happened in.
    pub period: u8,
    /// Clock snapshot at the moment of the action.
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
    /// Insertion timestamp.
    pub created_at: SystemTime,
    /// Actor that recorded the event.
    pub created_by: String,
}

/// Snapshot written to the durable sink when a game is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalSnapshotEntity {
    /// Finalized game.
    pub game_id: Uuid,
    /// Home team display name.
    pub home_name: String,
    /// Guest team display name.
    pub guest_name: String,
    /// Final home score.
    pub home_score: u32,
    /// Final guest score.
    pub guest_score: u32,
    /// Home fouls at the buzzer.
    pub home_fouls: u32,
    /// Guest fouls at the buzzer.
    pub guest_fouls: u32,
    /// Last period reached.
    pub periods_played: u8,
    /// Finalization timestamp.
    pub finalized_at: SystemTime,
    /// Actor that finalized the game.
    pub finalized_by: String,
}
