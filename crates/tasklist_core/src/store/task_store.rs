//! Task list persistence over a key-value store.
//!
//! # Responsibility
//! - Load the persisted list at startup and overwrite it on every save.
//! - Own the JSON wire shape of the persisted list.
//!
//! # Invariants
//! - An absent key loads as an empty list.
//! - Undecodable data is surfaced, never masked; decoded records are taken as stored.
//! - Record order and field values round-trip exactly.

use crate::model::task::Task;
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the persisted task list.
pub const DEFAULT_STORAGE_KEY: &str = "tasks_vinicius";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while loading or saving the task list.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "failed to decode persisted task list: {err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Mirrors the in-memory task list into one key-value entry.
pub struct TaskStore<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates a store using `DEFAULT_STORAGE_KEY`.
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reads the persisted list, or an empty list when nothing was saved yet.
    ///
    /// # Errors
    /// - `StoreError::Decode` when the stored value is not a task list.
    pub fn load(&self) -> StoreResult<Vec<Task>> {
        let Some(raw) = self.kv.get(&self.key)? else {
            info!("event=tasks_load module=store status=ok source=empty count=0");
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|err| {
            error!(
                "event=tasks_load module=store status=error error_code=decode_failed bytes={}",
                raw.len()
            );
            StoreError::Decode(err)
        })?;

        info!(
            "event=tasks_load module=store status=ok source=persisted count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    /// Serializes `tasks` and overwrites the persisted value.
    pub fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = serde_json::to_string(tasks).map_err(StoreError::Encode)?;
        if let Err(err) = self.kv.set(&self.key, &encoded) {
            error!(
                "event=tasks_save module=store status=error error_code=write_failed error={}",
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=tasks_save module=store status=ok count={} bytes={}",
            tasks.len(),
            encoded.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore, DEFAULT_STORAGE_KEY};
    use crate::model::task::{Task, TaskId};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn missing_key_loads_empty_list() {
        let kv = MemoryKeyValueStore::new();
        let store = TaskStore::new(&kv);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_writes_expected_json_shape() {
        let kv = MemoryKeyValueStore::new();
        let store = TaskStore::new(&kv);
        let tasks = vec![Task {
            id: TaskId::from("lq3k9x2a7fz"),
            text: "Buy milk".to_string(),
            completed: false,
        }];
        store.save(&tasks).unwrap();

        let raw = kv.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":"lq3k9x2a7fz","text":"Buy milk","completed":false}]"#
        );
    }

    #[test]
    fn malformed_value_is_a_decode_error() {
        let kv = MemoryKeyValueStore::new();
        kv.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let err = TaskStore::new(&kv).load().unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn decodable_records_load_as_stored_without_invariant_checks() {
        let kv = MemoryKeyValueStore::new();
        kv.set(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"a","text":"","completed":false},{"id":"a","text":"twin","completed":true}]"#,
        )
        .unwrap();

        let tasks = TaskStore::new(&kv).load().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "");
        assert_eq!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn custom_key_is_isolated_from_default() {
        let kv = MemoryKeyValueStore::new();
        let custom = TaskStore::with_key(&kv, "other");
        custom
            .save(&[Task::with_id(TaskId::from("x"), "only here").unwrap()])
            .unwrap();

        assert_eq!(custom.key(), "other");
        assert_eq!(custom.load().unwrap().len(), 1);
        assert!(TaskStore::new(&kv).load().unwrap().is_empty());
    }
}
