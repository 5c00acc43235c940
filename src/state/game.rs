//! Runtime representation of a live game: the event log, the fold-derived
//! aggregate, the clock state machine, and the last-write-wins metadata.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{FinalSnapshotEntity, GameEventEntity, GameStateEntity},
    state::{
        clock::{TimerError, TimerState},
        events::{Aggregate, EventType, GameEvent, Side},
    },
};

/// Lifecycle status of a live-layer game. `Final` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created but not yet started.
    Scheduled,
    /// Being scored right now.
    Live,
    /// Finalized; scores were handed back to the durable record.
    Final,
}

/// Fields a caller supplies when appending an event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Optional client-generated deduplication key.
    pub client_key: Option<String>,
    /// Action to record.
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
}

/// Result of appending an event to the log.
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    /// The event was inserted and folded into the aggregate.
    Applied(GameEvent),
    /// The client key was already seen; the original event is returned and
    /// nothing was applied a second time.
    Duplicate(GameEvent),
}

/// Aggregated live state for one game, guarded by a per-game async lock.
///
/// Every mutation appends to `events` and updates `totals` through the same
/// fold in one critical section, so the log and the aggregate cannot diverge.
#[derive(Debug, Clone)]
pub struct LiveGame {
    /// Identifier of the durable game record this live state mirrors.
    pub id: Uuid,
    /// Home team display name.
    pub home_name: String,
    /// Guest team display name.
    pub guest_name: String,
    /// Append-only action log, ordered by insertion.
    pub events: Vec<GameEvent>,
    /// Fold-derived running totals.
    pub totals: Aggregate,
    /// Game clock state machine.
    pub timer: TimerState,
    /// Bench currently in possession.
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

impl LiveGame {
    /// Build a fresh scheduled game with a full clock and timeout budget.
    pub fn new(
        home_name: String,
        guest_name: String,
        clock_seconds: u32,
        timeouts_per_side: u32,
        created_by: String,
        now: SystemTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            home_name,
            guest_name,
            events: Vec::new(),
            totals: Aggregate::new(timeouts_per_side),
            timer: TimerState::stopped(clock_seconds),
            possession: None,
            status: GameStatus::Scheduled,
            timeouts_per_side,
            created_at: now,
            updated_at: now,
            updated_by: created_by,
        }
    }

    /// Whether the game reached its terminal status.
    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    /// Remaining clock seconds at `now`, derived while running.
    pub fn clock_seconds(&self, now: SystemTime) -> u32 {
        self.timer.remaining(now)
    }

    /// Append an event and fold it into the aggregate.
    ///
    /// A repeated client key for this game is a no-op that reports the
    /// original entry, so clients can blindly retry after a network hiccup.
    pub fn record_event(&mut self, draft: EventDraft, actor: &str, now: SystemTime) -> AppendOutcome {
        if let Some(key) = draft.client_key.as_deref() {
            if let Some(original) = self
                .events
                .iter()
                .find(|event| event.client_key.as_deref() == Some(key))
            {
                return AppendOutcome::Duplicate(original.clone());
            }
        }

        let event = GameEvent {
            id: Uuid::new_v4(),
            client_key: draft.client_key,
            event_type: draft.event_type,
            period: draft.period,
            clock_at: draft.clock_at,
            side: draft.side,
            player: draft.player,
            roster_ref: draft.roster_ref,
            value: draft.value,
            description: draft.description,
            created_at: now,
            created_by: actor.to_string(),
        };

        self.totals.apply(&event);
        self.events.push(event.clone());
        self.touch(actor, now);
        AppendOutcome::Applied(event)
    }

    /// Delete an event and reverse its contribution by replaying the
    /// remaining log.
    pub fn delete_event(&mut self, event_id: Uuid, actor: &str, now: SystemTime) -> Option<GameEvent> {
        let index = self.events.iter().position(|event| event.id == event_id)?;
        let removed = self.events.remove(index);
        self.totals = Aggregate::replay(&self.events, self.timeouts_per_side);
        self.touch(actor, now);
        Some(removed)
    }

    /// Start the clock and record the transition in the log.
    pub fn start_timer(
        &mut self,
        clock_seconds: Option<u32>,
        actor: &str,
        now: SystemTime,
    ) -> Result<GameEvent, TimerError> {
        self.timer = self.timer.start(now, clock_seconds)?;
        Ok(self.record_clock_event(EventType::ClockStart, "clock started", actor, now))
    }

    /// Stop the clock, persist the derived checkpoint, and record the
    /// transition in the log.
    pub fn stop_timer(
        &mut self,
        clock_seconds: Option<u32>,
        actor: &str,
        now: SystemTime,
    ) -> Result<GameEvent, TimerError> {
        self.timer = self.timer.stop(now, clock_seconds)?;
        Ok(self.record_clock_event(EventType::ClockStop, "clock stopped", actor, now))
    }

    /// Update the last-write-wins metadata.
    pub fn touch(&mut self, actor: &str, now: SystemTime) {
        self.updated_at = now;
        self.updated_by = actor.to_string();
    }

    fn record_clock_event(
        &mut self,
        event_type: EventType,
        description: &str,
        actor: &str,
        now: SystemTime,
    ) -> GameEvent {
        let draft = EventDraft {
            client_key: None,
            event_type,
            period: self.totals.current_period,
            clock_at: self.clock_seconds(now),
            side: None,
            player: None,
            roster_ref: None,
            value: None,
            description: description.to_string(),
        };
        match self.record_event(draft, actor, now) {
            AppendOutcome::Applied(event) | AppendOutcome::Duplicate(event) => event,
        }
    }

    /// Rebuild a live game from its persisted state row and event log.
    ///
    /// The aggregate is recomputed from the log rather than trusted from the
    /// stored row, so a partial write can never leave the two diverged.
    pub fn from_persisted(state: GameStateEntity, events: Vec<GameEventEntity>) -> Self {
        let events: Vec<GameEvent> = events.into_iter().map(Into::into).collect();
        let totals = Aggregate::replay(&events, state.timeouts_per_side);

        let timer = match (state.is_timer_running, state.timer_started_at) {
            (true, Some(started_at)) => TimerState::Running {
                initial_clock_seconds: state.clock_seconds,
                started_at,
            },
            // A running flag without a start timestamp violates the invariant;
            // fall back to a stopped checkpoint.
            _ => TimerState::stopped(state.clock_seconds),
        };

        Self {
            id: state.id,
            home_name: state.home_name,
            guest_name: state.guest_name,
            events,
            totals,
            timer,
            possession: state.possession,
            status: state.status,
            timeouts_per_side: state.timeouts_per_side,
            created_at: state.created_at,
            updated_at: state.updated_at,
            updated_by: state.updated_by,
        }
    }

    /// Snapshot handed to the durable sink on finalization.
    pub fn final_snapshot(&self, actor: &str, now: SystemTime) -> FinalSnapshotEntity {
        FinalSnapshotEntity {
            game_id: self.id,
            home_name: self.home_name.clone(),
            guest_name: self.guest_name.clone(),
            home_score: self.totals.home.score,
            guest_score: self.totals.guest.score,
            home_fouls: self.totals.home.fouls,
            guest_fouls: self.totals.guest.fouls,
            periods_played: self.totals.current_period,
            finalized_at: now,
            finalized_by: actor.to_string(),
        }
    }
}

impl From<&LiveGame> for GameStateEntity {
    fn from(game: &LiveGame) -> Self {
        Self {
            id: game.id,
            home_name: game.home_name.clone(),
            guest_name: game.guest_name.clone(),
            home_score: game.totals.home.score,
            guest_score: game.totals.guest.score,
            home_fouls: game.totals.home.fouls,
            guest_fouls: game.totals.guest.fouls,
            home_timeouts: game.totals.home.timeouts,
            guest_timeouts: game.totals.guest.timeouts,
            clock_seconds: game.timer.initial_clock_seconds(),
            is_timer_running: game.timer.is_running(),
            timer_started_at: game.timer.started_at(),
            current_period: game.totals.current_period,
            possession: game.possession,
            status: game.status,
            timeouts_per_side: game.timeouts_per_side,
            created_at: game.created_at,
            updated_at: game.updated_at,
            updated_by: game.updated_by.clone(),
        }
    }
}

impl From<GameEventEntity> for GameEvent {
    fn from(entity: GameEventEntity) -> Self {
        Self {
            id: entity.id,
            client_key: entity.client_key,
            event_type: entity.event_type,
            period: entity.period,
            clock_at: entity.clock_at,
            side: entity.side,
            player: entity.player,
            roster_ref: entity.roster_ref,
            value: entity.value,
            description: entity.description,
            created_at: entity.created_at,
            created_by: entity.created_by,
        }
    }
}

impl From<(Uuid, &GameEvent)> for GameEventEntity {
    fn from((game_id, event): (Uuid, &GameEvent)) -> Self {
        Self {
            id: event.id,
            game_id,
            client_key: event.client_key.clone(),
            event_type: event.event_type,
            period: event.period,
            clock_at: event.clock_at,
            side: event.side,
            player: event.player.clone(),
            roster_ref: event.roster_ref.clone(),
            value: event.value,
            description: event.description.clone(),
            created_at: event.created_at,
            created_by: event.created_by.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn fresh_game() -> LiveGame {
        LiveGame::new(
            "Hornets".into(),
            "Pioneers".into(),
            600,
            3,
            "scorer-1".into(),
            SystemTime::UNIX_EPOCH,
        )
    }

    fn score_draft(side: Side, value: i32, client_key: Option<&str>) -> EventDraft {
        EventDraft {
            client_key: client_key.map(Into::into),
            event_type: EventType::Score,
            period: 1,
            clock_at: 500,
            side: Some(side),
            player: None,
            roster_ref: None,
            value: Some(value),
            description: format!("{value} points"),
        }
    }

    #[test]
    fn appended_scores_accumulate_in_order() {
        let mut game = fresh_game();
        let now = SystemTime::UNIX_EPOCH;

        game.record_event(score_draft(Side::Home, 2, None), "scorer-1", now);
        game.record_event(score_draft(Side::Home, 3, None), "scorer-1", now);

        assert_eq!(game.totals.home.score, 5);
        assert_eq!(game.events.len(), 2);
        assert_eq!(game.events[0].value, Some(2));
        assert_eq!(game.events[1].value, Some(3));
    }

    #[test]
    fn repeated_client_key_is_a_no_op() {
        let mut game = fresh_game();
        let now = SystemTime::UNIX_EPOCH;

        let first = game.record_event(score_draft(Side::Home, 2, Some("tap-7")), "scorer-1", now);
        let AppendOutcome::Applied(original) = first else {
            panic!("first submission should apply");
        };

        let retry = game.record_event(score_draft(Side::Home, 2, Some("tap-7")), "scorer-1", now);
        match retry {
            AppendOutcome::Duplicate(event) => assert_eq!(event.id, original.id),
            AppendOutcome::Applied(_) => panic!("retry must not double-apply"),
        }

        assert_eq!(game.totals.home.score, 2);
        assert_eq!(game.events.len(), 1);
    }

    #[test]
    fn deleting_a_score_reverses_its_contribution() {
        let mut game = fresh_game();
        let now = SystemTime::UNIX_EPOCH;

        let AppendOutcome::Applied(two) =
            game.record_event(score_draft(Side::Home, 2, None), "scorer-1", now)
        else {
            panic!("append failed");
        };
        game.record_event(score_draft(Side::Home, 3, None), "scorer-1", now);

        game.delete_event(two.id, "scorer-1", now).unwrap();
        assert_eq!(game.totals.home.score, 3);
        assert_eq!(game.events.len(), 1);
    }

    #[test]
    fn timer_transitions_are_recorded_in_the_log() {
        let mut game = fresh_game();
        let t0 = SystemTime::UNIX_EPOCH;

        game.start_timer(None, "scorer-1", t0).unwrap();
        assert!(game.timer.is_running());

        let t1 = t0 + Duration::from_secs(5);
        game.stop_timer(None, "scorer-1", t1).unwrap();
        assert_eq!(game.timer, TimerState::stopped(595));

        let types: Vec<EventType> = game.events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::ClockStart, EventType::ClockStop]);
        assert_eq!(game.events[1].clock_at, 595);
    }

    #[test]
    fn rebuild_from_persisted_replays_the_log() {
        let mut game = fresh_game();
        let now = SystemTime::UNIX_EPOCH;
        game.record_event(score_draft(Side::Guest, 3, None), "scorer-1", now);
        game.record_event(score_draft(Side::Home, 2, None), "scorer-1", now);

        let mut state: GameStateEntity = (&game).into();
        // A diverged stored aggregate must not survive a reload.
        state.home_score = 99;
        let events = game
            .events
            .iter()
            .map(|event| GameEventEntity::from((game.id, event)))
            .collect();

        let rebuilt = LiveGame::from_persisted(state, events);
        assert_eq!(rebuilt.totals.home.score, 2);
        assert_eq!(rebuilt.totals.guest.score, 3);
        assert_eq!(rebuilt.events.len(), 2);
    }
}
