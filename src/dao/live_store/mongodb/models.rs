use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dao::models::{FinalSnapshotEntity, GameEventEntity, GameStateEntity},
    state::{
        events::{EventType, Side},
        game::GameStatus,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameStateDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    home_name: String,
    guest_name: String,
    home_score: u32,
    guest_score: u32,
    home_fouls: u32,
    guest_fouls: u32,
    home_timeouts: u32,
    guest_timeouts: u32,
    clock_seconds: u32,
    is_timer_running: bool,
    timer_started_at: Option<DateTime>,
    current_period: u8,
    possession: Option<Side>,
    status: GameStatus,
    timeouts_per_side: u32,
    created_at: DateTime,
    updated_at: DateTime,
    updated_by: String,
}

impl From<GameStateEntity> for MongoGameStateDocument {
    fn from(value: GameStateEntity) -> Self {
        Self {
            id: value.id,
            home_name: value.home_name,
            guest_name: value.guest_name,
            home_score: value.home_score,
            guest_score: value.guest_score,
            home_fouls: value.home_fouls,
            guest_fouls: value.guest_fouls,
            home_timeouts: value.home_timeouts,
            guest_timeouts: value.guest_timeouts,
            clock_seconds: value.clock_seconds,
            is_timer_running: value.is_timer_running,
            timer_started_at: value.timer_started_at.map(DateTime::from_system_time),
            current_period: value.current_period,
            possession: value.possession,
            status: value.status,
            timeouts_per_side: value.timeouts_per_side,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
            updated_by: value.updated_by,
        }
    }
}

impl From<MongoGameStateDocument> for GameStateEntity {
    fn from(value: MongoGameStateDocument) -> Self {
        Self {
            id: value.id,
            home_name: value.home_name,
            guest_name: value.guest_name,
            home_score: value.home_score,
            guest_score: value.guest_score,
            home_fouls: value.home_fouls,
            guest_fouls: value.guest_fouls,
            home_timeouts: value.home_timeouts,
            guest_timeouts: value.guest_timeouts,
            clock_seconds: value.clock_seconds,
            is_timer_running: value.is_timer_running,
            timer_started_at: value.timer_started_at.map(DateTime::to_system_time),
            current_period: value.current_period,
            possession: value.possession,
            status: value.status,
            timeouts_per_side: value.timeouts_per_side,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
            updated_by: value.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameEventDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    pub game_id: Uuid,
    client_key: Option<String>,
    event_type: EventType,
    period: u8,
    clock_at: u32,
    side: Option<Side>,
    player: Option<String>,
    roster_ref: Option<String>,
    value: Option<i32>,
    description: String,
    created_at: DateTime,
    created_by: String,
}

impl From<GameEventEntity> for MongoGameEventDocument {
    fn from(value: GameEventEntity) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            client_key: value.client_key,
            event_type: value.event_type,
            period: value.period,
            clock_at: value.clock_at,
            side: value.side,
            player: value.player,
            roster_ref: value.roster_ref,
            value: value.value,
            description: value.description,
            created_at: DateTime::from_system_time(value.created_at),
            created_by: value.created_by,
        }
    }
}

impl From<MongoGameEventDocument> for GameEventEntity {
    fn from(value: MongoGameEventDocument) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            client_key: value.client_key,
            event_type: value.event_type,
            period: value.period,
            clock_at: value.clock_at,
            side: value.side,
            player: value.player,
            roster_ref: value.roster_ref,
            value: value.value,
            description: value.description,
            created_at: value.created_at.to_system_time(),
            created_by: value.created_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoFinalSnapshotDocument {
    #[serde(rename = "_id")]
    game_id: Uuid,
    home_name: String,
    guest_name: String,
    home_score: u32,
    guest_score: u32,
    home_fouls: u32,
    guest_fouls: u32,
    periods_played: u8,
    finalized_at: DateTime,
    finalized_by: String,
}

impl From<FinalSnapshotEntity> for MongoFinalSnapshotDocument {
    fn from(value: FinalSnapshotEntity) -> Self {
        Self {
            game_id: value.game_id,
            home_name: value.home_name,
            guest_name: value.guest_name,
            home_score: value.home_score,
            guest_score: value.guest_score,
            home_fouls: value.home_fouls,
            guest_fouls: value.guest_fouls,
            periods_played: value.periods_played,
            finalized_at: DateTime::from_system_time(value.finalized_at),
            finalized_by: value.finalized_by,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
