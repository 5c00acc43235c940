//! Persistence layer: storage-agnostic entities, the live store trait, and
//! the MongoDB backend.

pub mod live_store;
pub mod models;
pub mod storage;
