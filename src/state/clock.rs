//! Derived game clock: a checkpoint plus elapsed wall-clock time instead of a
//! server-side ticking process.

use std::time::SystemTime;

use thiserror::Error;

/// Compute the remaining seconds for a clock started at `started_at` with
/// `initial_clock_seconds` on it.
///
/// The result clamps at zero; hitting the buzzer does not stop the timer by
/// itself, that is an explicit [`TimerState::stop`] transition.
pub fn derive_remaining(initial_clock_seconds: u32, started_at: SystemTime, now: SystemTime) -> u32 {
    let elapsed = now
        .duration_since(started_at)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    initial_clock_seconds.saturating_sub(elapsed.min(u64::from(u32::MAX)) as u32)
}

/// Error returned when a timer transition is attempted from the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// `start` was called while the clock was already running.
    #[error("timer is already running")]
    AlreadyRunning,
    /// `stop` was called while the clock was already stopped.
    #[error("timer is already stopped")]
    AlreadyStopped,
}

/// Two-state machine for the game clock.
///
/// While stopped the persisted checkpoint is authoritative; while running the
/// true remaining time must be derived from the start timestamp on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Clock is frozen at the checkpoint value.
    Stopped {
        /// Seconds remaining at the last checkpoint.
        clock_seconds: u32,
    },
    /// Clock is counting down from the checkpoint taken at `started_at`.
    Running {
        /// Checkpoint value when the clock was started.
        initial_clock_seconds: u32,
        /// Wall-clock instant the clock was started.
        started_at: SystemTime,
    },
}

impl TimerState {
    /// Fresh stopped timer with `clock_seconds` on it.
    pub fn stopped(clock_seconds: u32) -> Self {
        Self::Stopped { clock_seconds }
    }

    /// Whether the clock is currently counting down.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Start timestamp, present only while running.
    pub fn started_at(&self) -> Option<SystemTime> {
        match self {
            Self::Running { started_at, .. } => Some(*started_at),
            Self::Stopped { .. } => None,
        }
    }

    /// Checkpoint the countdown derives from.
    pub fn initial_clock_seconds(&self) -> u32 {
        match self {
            Self::Stopped { clock_seconds } => *clock_seconds,
            Self::Running {
                initial_clock_seconds,
                ..
            } => *initial_clock_seconds,
        }
    }

    /// Instantaneously-correct remaining seconds at `now`.
    pub fn remaining(&self, now: SystemTime) -> u32 {
        match self {
            Self::Stopped { clock_seconds } => *clock_seconds,
            Self::Running {
                initial_clock_seconds,
                started_at,
            } => derive_remaining(*initial_clock_seconds, *started_at, now),
        }
    }

    /// Start the clock, optionally overriding the checkpoint value.
    ///
    /// Rejected while already running so stacked start timestamps can never
    /// double-count elapsed time.
    pub fn start(&self, now: SystemTime, clock_seconds: Option<u32>) -> Result<Self, TimerError> {
        match self {
            Self::Running { .. } => Err(TimerError::AlreadyRunning),
            Self::Stopped {
                clock_seconds: checkpoint,
            } => Ok(Self::Running {
                initial_clock_seconds: clock_seconds.unwrap_or(*checkpoint),
                started_at: now,
            }),
        }
    }

    /// Stop the clock, persisting the derived remaining time as the new
    /// checkpoint (unless an explicit correction is supplied).
    pub fn stop(&self, now: SystemTime, clock_seconds: Option<u32>) -> Result<Self, TimerError> {
        match self {
            Self::Stopped { .. } => Err(TimerError::AlreadyStopped),
            Self::Running { .. } => Ok(Self::Stopped {
                clock_seconds: clock_seconds.unwrap_or_else(|| self.remaining(now)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(base: SystemTime, offset_ms: u64) -> SystemTime {
        base + Duration::from_millis(offset_ms)
    }

    #[test]
    fn derived_clock_never_negative() {
        let start = SystemTime::UNIX_EPOCH;
        assert_eq!(derive_remaining(10, start, at(start, 9_999)), 1);
        assert_eq!(derive_remaining(10, start, at(start, 10_000)), 0);
        assert_eq!(derive_remaining(10, start, at(start, 3_600_000)), 0);
    }

    #[test]
    fn derived_clock_floors_partial_seconds() {
        let start = SystemTime::UNIX_EPOCH;
        assert_eq!(derive_remaining(600, start, at(start, 4_999)), 596);
        assert_eq!(derive_remaining(600, start, at(start, 5_000)), 595);
    }

    #[test]
    fn stopped_clock_ignores_wall_time() {
        let timer = TimerState::stopped(600);
        assert_eq!(timer.remaining(SystemTime::UNIX_EPOCH), 600);
        assert_eq!(timer.remaining(at(SystemTime::UNIX_EPOCH, 120_000)), 600);
    }

    #[test]
    fn start_then_stop_scenario() {
        let t0 = SystemTime::UNIX_EPOCH;
        let timer = TimerState::stopped(600);

        let running = timer.start(t0, None).unwrap();
        assert!(running.is_running());
        assert_eq!(running.started_at(), Some(t0));
        assert_eq!(running.remaining(at(t0, 5_000)), 595);

        let stopped = running.stop(at(t0, 5_000), None).unwrap();
        assert_eq!(stopped, TimerState::stopped(595));
        assert!(stopped.started_at().is_none());
    }

    #[test]
    fn immediate_stop_keeps_checkpoint() {
        let t0 = SystemTime::UNIX_EPOCH;
        let running = TimerState::stopped(480).start(t0, None).unwrap();
        let stopped = running.stop(t0, None).unwrap();
        assert_eq!(stopped, TimerState::stopped(480));
    }

    #[test]
    fn double_start_rejected() {
        let t0 = SystemTime::UNIX_EPOCH;
        let running = TimerState::stopped(600).start(t0, None).unwrap();
        assert_eq!(
            running.start(at(t0, 1_000), None),
            Err(TimerError::AlreadyRunning)
        );
    }

    #[test]
    fn double_stop_rejected() {
        let timer = TimerState::stopped(600);
        assert_eq!(
            timer.stop(SystemTime::UNIX_EPOCH, None),
            Err(TimerError::AlreadyStopped)
        );
    }

    #[test]
    fn start_with_override_uses_supplied_checkpoint() {
        let t0 = SystemTime::UNIX_EPOCH;
        let running = TimerState::stopped(600).start(t0, Some(300)).unwrap();
        assert_eq!(running.remaining(at(t0, 10_000)), 290);
    }
}
