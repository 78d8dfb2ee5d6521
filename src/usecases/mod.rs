//! Application use cases. Orchestrate domain logic via ports.

pub mod blocker_service;
pub mod sync_service;

pub use blocker_service::BlockerService;
pub use sync_service::{FreezeDay, SyncService, SyncStats};
