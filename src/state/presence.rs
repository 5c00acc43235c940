//! Ephemeral registry of who is viewing or scoring each game.
//!
//! Records are refreshed by heartbeats and evicted by a TTL sweep, so a
//! client that disconnects uncleanly stops showing as "viewing" once its
//! records go stale.

use std::time::{Duration, SystemTime};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Whether a connected client is driving the score or just watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PresenceRole {
    /// Actively recording events.
    Scorer,
    /// Read-only viewer.
    Spectator,
}

/// Key identifying one session: the same user may watch from several tabs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresenceKey {
    /// Game being watched.
    pub game_id: Uuid,
    /// Authenticated user.
    pub user_id: String,
    /// Caller-supplied session identifier.
    pub client_id: String,
}

/// One live presence entry.
#[derive(Debug, Clone)]
pub struct PresenceRecord {
    /// Role announced on join.
    pub role: PresenceRole,
    /// Last join or heartbeat instant.
    pub last_seen_at: SystemTime,
}

/// Concurrent presence registry shared across all games.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    records: DashMap<PresenceKey, PresenceRecord>,
}

impl PresenceTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a session. Joining twice with the same key keeps one record.
    pub fn join(&self, key: PresenceKey, role: PresenceRole, now: SystemTime) {
        self.records.insert(
            key,
            PresenceRecord {
                role,
                last_seen_at: now,
            },
        );
    }

    /// Refresh a session's freshness. Returns `false` when the record is
    /// unknown (expired or never joined) so the caller can ask for a re-join.
    pub fn heartbeat(&self, key: &PresenceKey, now: SystemTime) -> bool {
        match self.records.get_mut(key) {
            Some(mut record) => {
                record.last_seen_at = now;
                true
            }
            None => false,
        }
    }

    /// Remove every session the user has open on this game. Returns how many
    /// records were dropped.
    pub fn leave(&self, game_id: Uuid, user_id: &str) -> usize {
        let before = self.records.len();
        self.records
            .retain(|key, _| !(key.game_id == game_id && key.user_id == user_id));
        before - self.records.len()
    }

    /// Snapshot of all sessions on a game.
    pub fn list(&self, game_id: Uuid) -> Vec<(PresenceKey, PresenceRecord)> {
        self.records
            .iter()
            .filter(|entry| entry.key().game_id == game_id)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Evict records whose last heartbeat is older than `ttl`, returning the
    /// games that lost at least one viewer.
    pub fn sweep(&self, ttl: Duration, now: SystemTime) -> Vec<Uuid> {
        let mut touched = Vec::new();
        self.records.retain(|key, record| {
            let stale = now
                .duration_since(record.last_seen_at)
                .map(|age| age > ttl)
                .unwrap_or(false);
            if stale {
                touched.push(key.game_id);
            }
            !stale
        });
        touched.sort_unstable();
        touched.dedup();
        touched
    }

    /// Drop every session attached to a game (used when the game is removed).
    pub fn clear_game(&self, game_id: Uuid) {
        self.records.retain(|key, _| key.game_id != game_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(game_id: Uuid, user: &str, client: &str) -> PresenceKey {
        PresenceKey {
            game_id,
            user_id: user.into(),
            client_id: client.into(),
        }
    }

    #[test]
    fn duplicate_join_keeps_one_record() {
        let tracker = PresenceTracker::new();
        let game_id = Uuid::new_v4();
        let now = SystemTime::UNIX_EPOCH;

        tracker.join(key(game_id, "ada", "tab-1"), PresenceRole::Spectator, now);
        tracker.join(key(game_id, "ada", "tab-1"), PresenceRole::Scorer, now);

        let sessions = tracker.list(game_id);
        assert_eq!(sessions.len(), 1);
        assert!(matches!(sessions[0].1.role, PresenceRole::Scorer));
    }

    #[test]
    fn multiple_tabs_are_distinct_sessions() {
        let tracker = PresenceTracker::new();
        let game_id = Uuid::new_v4();
        let now = SystemTime::UNIX_EPOCH;

        tracker.join(key(game_id, "ada", "tab-1"), PresenceRole::Spectator, now);
        tracker.join(key(game_id, "ada", "tab-2"), PresenceRole::Spectator, now);
        assert_eq!(tracker.list(game_id).len(), 2);

        assert_eq!(tracker.leave(game_id, "ada"), 2);
        assert!(tracker.list(game_id).is_empty());
    }

    #[test]
    fn heartbeat_unknown_session_reports_missing() {
        let tracker = PresenceTracker::new();
        let now = SystemTime::UNIX_EPOCH;
        assert!(!tracker.heartbeat(&key(Uuid::new_v4(), "ada", "tab-1"), now));
    }

    #[test]
    fn sweep_evicts_only_stale_records() {
        let tracker = PresenceTracker::new();
        let game_id = Uuid::new_v4();
        let t0 = SystemTime::UNIX_EPOCH;
        let ttl = Duration::from_secs(60);

        tracker.join(key(game_id, "ada", "tab-1"), PresenceRole::Scorer, t0);
        tracker.join(
            key(game_id, "grace", "tab-1"),
            PresenceRole::Spectator,
            t0 + Duration::from_secs(90),
        );

        let touched = tracker.sweep(ttl, t0 + Duration::from_secs(120));
        assert_eq!(touched, vec![game_id]);

        let remaining = tracker.list(game_id);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0.user_id, "grace");
    }

    #[test]
    fn heartbeat_defers_eviction() {
        let tracker = PresenceTracker::new();
        let game_id = Uuid::new_v4();
        let t0 = SystemTime::UNIX_EPOCH;
        let session = key(game_id, "ada", "tab-1");
        let ttl = Duration::from_secs(60);

        tracker.join(session.clone(), PresenceRole::Scorer, t0);
        assert!(tracker.heartbeat(&session, t0 + Duration::from_secs(50)));

        assert!(tracker.sweep(ttl, t0 + Duration::from_secs(90)).is_empty());
        assert_eq!(tracker.list(game_id).len(), 1);
    }
}
