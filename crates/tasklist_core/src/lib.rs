//! Core logic for the tasklist app.
//! Store, view model and controller live here; hosts only supply I/O.

pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use controller::TaskController;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskId};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use store::task_store::{StoreError, StoreResult, TaskStore, DEFAULT_STORAGE_KEY};
pub use view::{render, update_count, Control, TaskRow, TaskView, ViewModel};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
