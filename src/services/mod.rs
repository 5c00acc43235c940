//! Service layer: game lifecycle, action log, timer, presence, streaming,
//! health, and the storage supervisor.

pub mod documentation;
pub mod event_service;
pub mod game_service;
pub mod health_service;
pub mod presence_service;
pub mod sse_events;
pub mod sse_service;
pub mod storage_supervisor;
pub mod timer_service;
