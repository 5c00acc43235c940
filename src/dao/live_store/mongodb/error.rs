use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for the MongoDB backend.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures specific to the MongoDB live store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save state for game `{id}`")]
    SaveState {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to append event `{event_id}` for game `{game_id}`")]
    AppendEvent {
        game_id: Uuid,
        event_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete event `{event_id}` for game `{game_id}`")]
    DeleteEvent {
        game_id: Uuid,
        event_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load state for game `{id}`")]
    LoadState {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load events for game `{id}`")]
    LoadEvents {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list game states")]
    ListStates {
        #[source]
        source: MongoError,
    },
    #[error("failed to save final snapshot for game `{id}`")]
    SaveFinalSnapshot {
        id: Uuid,
        #[source]
        source: MongoError,
    },
}
