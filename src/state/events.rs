//! Append-only game event log entries and the pure fold that derives the
//! score/foul/timeout aggregate from them.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Which bench an event or possession belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Home team.
    Home,
    /// Guest team.
    Guest,
}

/// Fixed enumeration of actions the scorer console can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EventType {
    Score,
    Foul,
    Timeout,
    Sub,
    Turnover,
    Block,
    Steal,
    ReboundOff,
    ReboundDef,
    PeriodStart,
    PeriodEnd,
    ClockStart,
    ClockStop,
    Undo,
    Miss,
}

/// One immutable entry in a game's action log.
///
/// Events are only ever appended; the single exception is explicit deletion
/// used for corrections, after which the aggregate is recomputed by replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    /// Durable identifier assigned on insertion.
    pub id: Uuid,
    /// Optional client-generated key used to deduplicate retried submissions.
    pub client_key: Option<String>,
    /// Action recorded by this entry.
    pub event_type: EventType,
    /// Period the event happened in.
    pub period: u8,
    /// Clock seconds remaining when the event was recorded (a snapshot).
    pub clock_at: u32,
    /// Bench the event belongs to, when applicable.
    pub side: Option<Side>,
    /// Display name of the involved player, when known.
    pub player: Option<String>,
    /// Opaque reference to a roster entry in the durable system of record.
    pub roster_ref: Option<String>,
    /// Signed point or foul delta carried by the event.
    pub value: Option<i32>,
    /// Human-readable summary, denormalized for display.
    pub description: String,
    /// Insertion timestamp; log order is `created_at`, then insertion order.
    pub created_at: SystemTime,
    /// Actor that recorded the event.
    pub created_by: String,
}

/// Running totals for one bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTotals {
    /// Points scored.
    pub score: u32,
    /// Fouls committed in the current period.
    pub fouls: u32,
    /// Timeouts left.
    pub timeouts: u32,
}

impl SideTotals {
    fn new(timeouts: u32) -> Self {
        Self {
            score: 0,
            fouls: 0,
            timeouts,
        }
    }
}

/// Denormalized running totals derived from the event log.
///
/// The fold is the source of truth: appending an event applies exactly one
/// [`Aggregate::apply`] step, and deleting one recomputes via [`Aggregate::replay`],
/// so the displayed score always equals the sum of score events in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    /// Home bench totals.
    pub home: SideTotals,
    /// Guest bench totals.
    pub guest: SideTotals,
    /// Period currently being played.
    pub current_period: u8,
}

impl Aggregate {
    /// Pre-game aggregate with full timeout budgets on both benches.
    pub fn new(timeouts_per_side: u32) -> Self {
        Self {
            home: SideTotals::new(timeouts_per_side),
            guest: SideTotals::new(timeouts_per_side),
            current_period: 1,
        }
    }

    /// Apply a single event's numeric contribution.
    pub fn apply(&mut self, event: &GameEvent) {
        match event.event_type {
            EventType::Score => {
                if let Some(totals) = self.side_mut(event.side) {
                    totals.score = totals.score.saturating_add_signed(event.value.unwrap_or(0));
                }
            }
            EventType::Foul => {
                if let Some(totals) = self.side_mut(event.side) {
                    totals.fouls = totals.fouls.saturating_add_signed(event.value.unwrap_or(1));
                }
            }
            EventType::Timeout => {
                if let Some(totals) = self.side_mut(event.side) {
                    totals.timeouts = totals.timeouts.saturating_sub(1);
                }
            }
            EventType::PeriodStart => {
                self.current_period = event.period;
                // Team fouls reset at the start of each period.
                self.home.fouls = 0;
                self.guest.fouls = 0;
            }
            _ => {}
        }
    }

    /// Recompute the aggregate by folding the whole log in order.
    pub fn replay<'a>(
        events: impl IntoIterator<Item = &'a GameEvent>,
        timeouts_per_side: u32,
    ) -> Self {
        let mut aggregate = Self::new(timeouts_per_side);
        for event in events {
            aggregate.apply(event);
        }
        aggregate
    }

    fn side_mut(&mut self, side: Option<Side>) -> Option<&mut SideTotals> {
        match side? {
            Side::Home => Some(&mut self.home),
            Side::Guest => Some(&mut self.guest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(side: Side, value: i32) -> GameEvent {
        event(EventType::Score, Some(side), Some(value))
    }

    fn event(event_type: EventType, side: Option<Side>, value: Option<i32>) -> GameEvent {
        GameEvent {
            id: Uuid::new_v4(),
            client_key: None,
            event_type,
            period: 1,
            clock_at: 600,
            side,
            player: None,
            roster_ref: None,
            value,
            description: String::new(),
            created_at: SystemTime::UNIX_EPOCH,
            created_by: "scorer".into(),
        }
    }

    #[test]
    fn score_events_sum_per_side() {
        let log = vec![
            score(Side::Home, 2),
            score(Side::Guest, 3),
            score(Side::Home, 3),
        ];
        let aggregate = Aggregate::replay(&log, 3);
        assert_eq!(aggregate.home.score, 5);
        assert_eq!(aggregate.guest.score, 3);
    }

    #[test]
    fn interleaving_does_not_disturb_sides() {
        let mut interleaved = Vec::new();
        for _ in 0..4 {
            interleaved.push(score(Side::Home, 2));
            interleaved.push(score(Side::Guest, 3));
        }
        let aggregate = Aggregate::replay(&interleaved, 3);
        assert_eq!(aggregate.home.score, 8);
        assert_eq!(aggregate.guest.score, 12);
    }

    #[test]
    fn replay_after_removal_yields_corrected_total() {
        let mut log = vec![score(Side::Home, 2), score(Side::Home, 3)];
        assert_eq!(Aggregate::replay(&log, 3).home.score, 5);

        log.remove(0);
        assert_eq!(Aggregate::replay(&log, 3).home.score, 3);
    }

    #[test]
    fn fouls_reset_on_period_start() {
        let mut period_start = event(EventType::PeriodStart, None, None);
        period_start.period = 2;

        let log = vec![
            event(EventType::Foul, Some(Side::Home), None),
            event(EventType::Foul, Some(Side::Home), None),
            period_start,
            event(EventType::Foul, Some(Side::Guest), None),
        ];
        let aggregate = Aggregate::replay(&log, 3);
        assert_eq!(aggregate.current_period, 2);
        assert_eq!(aggregate.home.fouls, 0);
        assert_eq!(aggregate.guest.fouls, 1);
    }

    #[test]
    fn timeouts_decrement_and_floor_at_zero() {
        let log = vec![
            event(EventType::Timeout, Some(Side::Home), None),
            event(EventType::Timeout, Some(Side::Home), None),
            event(EventType::Timeout, Some(Side::Home), None),
            event(EventType::Timeout, Some(Side::Home), None),
        ];
        let aggregate = Aggregate::replay(&log, 3);
        assert_eq!(aggregate.home.timeouts, 0);
        assert_eq!(aggregate.guest.timeouts, 3);
    }

    #[test]
    fn clock_and_possession_events_leave_totals_alone() {
        let log = vec![
            event(EventType::ClockStart, None, None),
            event(EventType::Turnover, Some(Side::Home), None),
            event(EventType::ClockStop, None, None),
        ];
        let aggregate = Aggregate::replay(&log, 3);
        assert_eq!(aggregate, Aggregate::new(3));
    }

    #[test]
    fn negative_score_value_saturates_at_zero() {
        let log = vec![score(Side::Home, 2), score(Side::Home, -5)];
        assert_eq!(Aggregate::replay(&log, 3).home.score, 0);
    }
}
