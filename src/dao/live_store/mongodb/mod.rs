//! MongoDB implementation of the live store.

mod connection;
mod error;
mod models;
pub mod store;

pub use error::MongoDaoError;
pub use store::MongoLiveStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Connection settings for the MongoDB backend.
pub mod config {
    use mongodb::options::ClientOptions;

    use super::error::{MongoDaoError, MongoResult};

    #[derive(Clone)]
    /// Parsed client options plus the database name to operate on.
    pub struct MongoConfig {
        /// Driver options parsed from the connection URI.
        pub options: ClientOptions,
        /// Database holding the live collections.
        pub database_name: String,
    }

    impl MongoConfig {
        /// Parse a connection URI, defaulting the database name.
        pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
            let database_name = db_name.unwrap_or("courtside").to_owned();
            let options =
                ClientOptions::parse(uri)
                    .await
                    .map_err(|source| MongoDaoError::InvalidUri {
                        uri: uri.to_owned(),
                        source,
                    })?;

            Ok(Self {
                options,
                database_name,
            })
        }
    }
}
