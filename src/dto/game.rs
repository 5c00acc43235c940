//! Game lifecycle and timer payloads.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::format_system_time;
use crate::state::{
    events::Side,
    game::{GameStatus, LiveGame},
};

/// Payload for creating a new live game.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGameRequest {
    /// Home team display name.
    #[validate(length(min = 1, max = 80))]
    pub home_name: String,
    /// Guest team display name.
    #[validate(length(min = 1, max = 80))]
    pub guest_name: String,
    /// Initial period clock in seconds. Defaults to the configured period length.
    pub clock_seconds: Option<u32>,
    /// Timeout budget per bench. Defaults to the configured budget.
    pub timeouts_per_side: Option<u32>,
}

/// Partial update of scalar game state. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GameStateUpdateRequest {
    /// New possession arrow. `null` clears it, absent leaves it alone.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<Side>)]
    pub possession: Option<Option<Side>>,
    /// New lifecycle status.
    pub status: Option<GameStatus>,
    /// Explicit clock correction, applied only while the clock is stopped.
    pub clock_seconds: Option<u32>,
}

/// Full scoreboard snapshot of a live game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStateView {
    /// Game identifier.
    pub game_id: Uuid,
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
    /// Seconds remaining on the clock at the time of this snapshot.
    pub clock_seconds: u32,
    /// Whether the clock is counting down.
    pub is_timer_running: bool,
    /// RFC 3339 instant the clock was started, while running.
    pub timer_started_at: Option<String>,
    /// Period currently being played.
    pub current_period: u8,
    /// Bench holding the possession arrow.
    pub possession: Option<Side>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Number of events in the action log.
    pub event_count: usize,
    /// RFC 3339 instant of the last mutation.
    pub updated_at: String,
    /// Actor behind the last mutation.
    pub updated_by: String,
}

impl GameStateView {
    /// Snapshot a live game at `now`, deriving the clock while running.
    pub fn snapshot(game: &LiveGame, now: SystemTime) -> Self {
        Self {
            game_id: game.id,
            home_name: game.home_name.clone(),
            guest_name: game.guest_name.clone(),
            home_score: game.totals.home.score,
            guest_score: game.totals.guest.score,
            home_fouls: game.totals.home.fouls,
            guest_fouls: game.totals.guest.fouls,
            home_timeouts: game.totals.home.timeouts,
            guest_timeouts: game.totals.guest.timeouts,
            clock_seconds: game.clock_seconds(now),
            is_timer_running: game.timer.is_running(),
            timer_started_at: game.timer.started_at().map(format_system_time),
            current_period: game.totals.current_period,
            possession: game.possession,
            status: game.status,
            event_count: game.events.len(),
            updated_at: format_system_time(game.updated_at),
            updated_by: game.updated_by.clone(),
        }
    }
}

/// Condensed list entry for the games index.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Game identifier.
    pub game_id: Uuid,
    /// Home team display name.
    pub home_name: String,
    /// Guest team display name.
    pub guest_name: String,
    /// Home points.
    pub home_score: u32,
    /// Guest points.
    pub guest_score: u32,
    /// Seconds remaining on the clock at the time of this snapshot.
    pub clock_seconds: u32,
    /// Period currently being played.
    pub current_period: u8,
    /// Lifecycle status.
    pub status: GameStatus,
    /// RFC 3339 instant of the last mutation.
    pub updated_at: String,
}

impl GameSummary {
    /// Condensed snapshot of a live game at `now`.
    pub fn snapshot(game: &LiveGame, now: SystemTime) -> Self {
        Self {
            game_id: game.id,
            home_name: game.home_name.clone(),
            guest_name: game.guest_name.clone(),
            home_score: game.totals.home.score,
            guest_score: game.totals.guest.score,
            clock_seconds: game.clock_seconds(now),
            current_period: game.totals.current_period,
            status: game.status,
            updated_at: format_system_time(game.updated_at),
        }
    }
}

/// Query parameters accepted by the games index.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListGamesQuery {
    /// Restrict the listing to games in this status.
    pub status: Option<GameStatus>,
}

/// Clock transition to apply.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    /// Start the countdown.
    Start,
    /// Stop the countdown and checkpoint the remaining time.
    Stop,
}

/// Payload for the timer control endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TimerControlRequest {
    /// Transition to apply.
    pub action: TimerAction,
    /// Optional checkpoint override (a referee correction).
    pub clock_seconds: Option<u32>,
}

/// Timer snapshot, self-sufficient for client-side countdown rendering.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimerStateView {
    /// Whether the clock is counting down.
    pub is_running: bool,
    /// RFC 3339 instant the clock was started, while running.
    pub started_at: Option<String>,
    /// Checkpoint the countdown derives from.
    pub initial_clock_seconds: u32,
    /// Seconds remaining at the time of this snapshot.
    pub current_clock_seconds: u32,
}

impl TimerStateView {
    /// Snapshot a game's timer at `now`.
    pub fn snapshot(game: &LiveGame, now: SystemTime) -> Self {
        Self {
            is_running: game.timer.is_running(),
            started_at: game.timer.started_at().map(format_system_time),
            initial_clock_seconds: game.timer.initial_clock_seconds(),
            current_clock_seconds: game.clock_seconds(now),
        }
    }
}

/// Response returned after a game is finalized.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeResponse {
    /// Game identifier.
    pub game_id: Uuid,
    /// Final home points.
    pub home_score: u32,
    /// Final guest points.
    pub guest_score: u32,
    /// Periods played.
    pub periods_played: u8,
    /// RFC 3339 instant of finalization.
    pub finalized_at: String,
}
