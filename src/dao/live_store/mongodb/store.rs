//! MongoDB-backed [`LiveStore`] with reconnect support.

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoFinalSnapshotDocument, MongoGameEventDocument, MongoGameStateDocument, doc_id,
        uuid_as_binary,
    },
};
use crate::dao::{
    live_store::LiveStore,
    models::{FinalSnapshotEntity, GameEventEntity, GameStateEntity},
    storage::StorageResult,
};

const STATE_COLLECTION_NAME: &str = "game_states";
const EVENT_COLLECTION_NAME: &str = "game_events";
const SNAPSHOT_COLLECTION_NAME: &str = "final_snapshots";

#[derive(Clone)]
/// Handle on the MongoDB deployment holding the live collections.
pub struct MongoLiveStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoLiveStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let state_collection =
            database.collection::<mongodb::bson::Document>(STATE_COLLECTION_NAME);
        let state_index = mongodb::IndexModel::builder()
            .keys(doc! {"status": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("state_status_idx".to_owned()))
                    .build(),
            )
            .build();
        state_collection
            .create_index(state_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: STATE_COLLECTION_NAME,
                index: "status",
                source,
            })?;

        // Event log reads are always per-game and ordered by creation time.
        let event_collection = database.collection::<MongoGameEventDocument>(EVENT_COLLECTION_NAME);
        let event_index = mongodb::IndexModel::builder()
            .keys(doc! {"game_id": 1, "created_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("event_game_created_idx".to_owned()))
                    .build(),
            )
            .build();
        event_collection
            .create_index(event_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: EVENT_COLLECTION_NAME,
                index: "game_id,created_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn state_collection(&self) -> Collection<MongoGameStateDocument> {
        self.database()
            .await
            .collection::<MongoGameStateDocument>(STATE_COLLECTION_NAME)
    }

    async fn event_collection(&self) -> Collection<MongoGameEventDocument> {
        self.database()
            .await
            .collection::<MongoGameEventDocument>(EVENT_COLLECTION_NAME)
    }

    async fn snapshot_collection(&self) -> Collection<MongoFinalSnapshotDocument> {
        self.database()
            .await
            .collection::<MongoFinalSnapshotDocument>(SNAPSHOT_COLLECTION_NAME)
    }

    async fn save_state(&self, state: GameStateEntity) -> MongoResult<()> {
        let id = state.id;
        let document: MongoGameStateDocument = state.into();
        let collection = self.state_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveState { id, source })?;
        Ok(())
    }

    async fn append_event(&self, event: GameEventEntity) -> MongoResult<()> {
        let game_id = event.game_id;
        let event_id = event.id;
        let document: MongoGameEventDocument = event.into();
        let collection = self.event_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::AppendEvent {
                game_id,
                event_id,
                source,
            })?;
        Ok(())
    }

    async fn delete_event(&self, game_id: Uuid, event_id: Uuid) -> MongoResult<()> {
        let collection = self.event_collection().await;
        collection
            .delete_one(doc_id(event_id))
            .await
            .map_err(|source| MongoDaoError::DeleteEvent {
                game_id,
                event_id,
                source,
            })?;
        Ok(())
    }

    async fn find_state(&self, game_id: Uuid) -> MongoResult<Option<GameStateEntity>> {
        let collection = self.state_collection().await;
        let document = collection
            .find_one(doc_id(game_id))
            .await
            .map_err(|source| MongoDaoError::LoadState {
                id: game_id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn load_events(&self, game_id: Uuid) -> MongoResult<Vec<GameEventEntity>> {
        let collection = self.event_collection().await;
        let documents: Vec<MongoGameEventDocument> = collection
            .find(doc! { "game_id": uuid_as_binary(game_id) })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|source| MongoDaoError::LoadEvents {
                id: game_id,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadEvents {
                id: game_id,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_states(&self) -> MongoResult<Vec<GameStateEntity>> {
        let collection = self.state_collection().await;
        let documents: Vec<MongoGameStateDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListStates { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListStates { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_final_snapshot(&self, snapshot: FinalSnapshotEntity) -> MongoResult<()> {
        let id = snapshot.game_id;
        let document: MongoFinalSnapshotDocument = snapshot.into();
        let collection = self.snapshot_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveFinalSnapshot { id, source })?;
        Ok(())
    }
}

impl LiveStore for MongoLiveStore {
    fn save_state(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_state(state).await.map_err(Into::into) })
    }

    fn append_event(&self, event: GameEventEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.append_event(event).await.map_err(Into::into) })
    }

    fn delete_event(
        &self,
        game_id: Uuid,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_event(game_id, event_id)
                .await
                .map_err(Into::into)
        })
    }

    fn find_state(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_state(game_id).await.map_err(Into::into) })
    }

    fn load_events(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEventEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_events(game_id).await.map_err(Into::into) })
    }

    fn list_states(&self) -> BoxFuture<'static, StorageResult<Vec<GameStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_states().await.map_err(Into::into) })
    }

    fn save_final_snapshot(
        &self,
        snapshot: FinalSnapshotEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save_final_snapshot(snapshot)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
