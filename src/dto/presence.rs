//! Presence payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{format_system_time, validation::validate_client_id};
use crate::state::presence::{PresenceKey, PresenceRecord, PresenceRole};

/// Payload for announcing presence on a game.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinGameRequest {
    /// Caller-supplied session identifier, distinct per open tab.
    #[validate(custom(function = "validate_client_id"))]
    pub client_id: String,
    /// Announced role.
    pub role: PresenceRole,
}

/// Payload for refreshing a presence record.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HeartbeatRequest {
    /// Session identifier announced on join.
    #[validate(custom(function = "validate_client_id"))]
    pub client_id: String,
}

/// Response to a heartbeat.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeartbeatResponse {
    /// `false` when the record expired and the client must re-join.
    pub active: bool,
}

/// One presence session visible on a game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresenceEntryView {
    /// Authenticated user behind the session.
    pub user_id: String,
    /// Session identifier.
    pub client_id: String,
    /// Announced role.
    pub role: PresenceRole,
    /// RFC 3339 instant of the last join or heartbeat.
    pub last_seen_at: String,
}

impl From<(PresenceKey, PresenceRecord)> for PresenceEntryView {
    fn from((key, record): (PresenceKey, PresenceRecord)) -> Self {
        Self {
            user_id: key.user_id,
            client_id: key.client_id,
            role: record.role,
            last_seen_at: format_system_time(record.last_seen_at),
        }
    }
}

/// All sessions currently on a game.
#[derive(Debug, Serialize, ToSchema)]
pub struct PresenceListResponse {
    /// Number of sessions.
    pub count: usize,
    /// The sessions themselves.
    pub viewers: Vec<PresenceEntryView>,
}
