//! Named notifications pushed on per-game streams after each mutation.

use uuid::Uuid;

use crate::{
    dto::{
        event::GameEventView,
        game::{GameStateView, TimerStateView},
        presence::PresenceEntryView,
        sse::{
            EventAddedPayload, EventDeletedPayload, GameFinalizedPayload, PresenceChangedPayload,
            ServerEvent, StateUpdatedPayload, TimerChangedPayload,
        },
    },
    state::GameStreams,
};

/// Scoreboard snapshot changed for any reason.
pub const EVENT_STATE_UPDATED: &str = "state.updated";
/// An entry was appended to the action log.
pub const EVENT_ADDED: &str = "event.added";
/// An entry was removed from the action log.
pub const EVENT_DELETED: &str = "event.deleted";
/// The clock was started or stopped.
pub const EVENT_TIMER_CHANGED: &str = "timer.changed";
/// The viewer roster changed.
pub const EVENT_PRESENCE_CHANGED: &str = "presence.changed";
/// The game reached its terminal status.
pub const EVENT_GAME_FINALIZED: &str = "game.finalized";

/// Push the post-mutation scoreboard snapshot.
pub fn broadcast_state_updated(streams: &GameStreams, game_id: Uuid, state: GameStateView) {
    streams.broadcast(
        game_id,
        ServerEvent::json(EVENT_STATE_UPDATED, &StateUpdatedPayload { state }),
    );
}

/// Push an appended log entry together with the folded snapshot.
pub fn broadcast_event_added(
    streams: &GameStreams,
    game_id: Uuid,
    event: GameEventView,
    state: GameStateView,
) {
    streams.broadcast(
        game_id,
        ServerEvent::json(EVENT_ADDED, &EventAddedPayload { event, state }),
    );
}

/// Push a log deletion together with the replayed snapshot.
pub fn broadcast_event_deleted(
    streams: &GameStreams,
    game_id: Uuid,
    event_id: Uuid,
    state: GameStateView,
) {
    streams.broadcast(
        game_id,
        ServerEvent::json(EVENT_DELETED, &EventDeletedPayload { event_id, state }),
    );
}

/// Push a clock transition.
pub fn broadcast_timer_changed(streams: &GameStreams, game_id: Uuid, timer: TimerStateView) {
    streams.broadcast(
        game_id,
        ServerEvent::json(EVENT_TIMER_CHANGED, &TimerChangedPayload { timer }),
    );
}

/// Push the refreshed viewer roster.
pub fn broadcast_presence_changed(
    streams: &GameStreams,
    game_id: Uuid,
    viewers: Vec<PresenceEntryView>,
) {
    streams.broadcast(
        game_id,
        ServerEvent::json(
            EVENT_PRESENCE_CHANGED,
            &PresenceChangedPayload {
                count: viewers.len(),
                viewers,
            },
        ),
    );
}

/// Push the terminal notification; streams on this game will not see further
/// scoring events.
pub fn broadcast_game_finalized(
    streams: &GameStreams,
    game_id: Uuid,
    home_score: u32,
    guest_score: u32,
) {
    streams.broadcast(
        game_id,
        ServerEvent::json(
            EVENT_GAME_FINALIZED,
            &GameFinalizedPayload {
                game_id,
                home_score,
                guest_score,
            },
        ),
    );
}
