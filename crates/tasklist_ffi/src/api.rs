//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list actions to Dart via FRB.
//! - Return the complete rendered list after every action.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens its own connection and controller; no list state is
//!   kept between calls besides what is persisted.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    SqliteKeyValueStore, StoreResult, TaskController, TaskId, TaskStore, TaskView, ViewModel,
};

const DB_FILE_NAME: &str = "tasklist_ffi.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every task call.
///
/// Must run before the first task call; afterwards only the already active
/// path is accepted. Returns empty string on success and an error message
/// on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One rendered task row for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Glyph for the complete/undo button.
    pub toggle_glyph: String,
    pub toggle_title: String,
    pub delete_glyph: String,
    pub delete_title: String,
}

/// Response envelope for every task action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Whether the action (and its save) succeeded.
    pub ok: bool,
    /// Rows newest first; empty on failure.
    pub rows: Vec<TaskRowItem>,
    /// Counter line, e.g. `1 of 2 active tasks`.
    pub count_text: String,
    /// Empty on success, diagnostic text on failure.
    pub message: String,
}

impl TaskListResponse {
    fn from_model(model: ViewModel) -> Self {
        Self {
            ok: true,
            rows: model.rows.into_iter().map(to_row_item).collect(),
            count_text: model.count_text,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            rows: Vec::new(),
            count_text: String::new(),
            message: message.into(),
        }
    }
}

/// Loads and renders the persisted list (startup).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_load() -> TaskListResponse {
    respond("tasks_load", |_| Ok(()))
}

/// Submits the input field text. Blank text leaves the list unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskListResponse {
    respond("task_add", |app| app.submit(&text))
}

/// Flips the completed flag of task `id`. Unknown ids are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskListResponse {
    respond("task_toggle", |app| app.toggle(&TaskId::from(id)))
}

/// Removes task `id`. Unknown ids are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskListResponse {
    respond("task_delete", |app| app.delete(&TaskId::from(id)))
}

/// Removes every completed task.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_completed() -> TaskListResponse {
    respond("tasks_clear_completed", |app| app.clear_completed())
}

/// Keeps only the latest render; input focus is owned by the Dart side.
#[derive(Default)]
struct SnapshotView {
    last: Option<ViewModel>,
}

impl TaskView for SnapshotView {
    fn render(&mut self, model: &ViewModel) {
        self.last = Some(model.clone());
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}
}

type FfiController<'conn> = TaskController<SqliteKeyValueStore<'conn>, SnapshotView>;

fn respond(
    operation: &str,
    action: impl FnOnce(&mut FfiController<'_>) -> StoreResult<()>,
) -> TaskListResponse {
    let db_path = resolve_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return TaskListResponse::failure(format!("{operation} failed: {err}")),
    };

    let store = TaskStore::new(SqliteKeyValueStore::new(&conn));
    let mut app = match TaskController::start(store, SnapshotView::default()) {
        Ok(app) => app,
        Err(err) => {
            warn!("event=ffi_call module=ffi op={operation} status=error stage=load");
            return TaskListResponse::failure(format!("{operation} failed: {err}"));
        }
    };

    if let Err(err) = action(&mut app) {
        warn!("event=ffi_call module=ffi op={operation} status=error stage=action");
        return TaskListResponse::failure(format!("{operation} failed: {err}"));
    }

    match app.into_view().last {
        Some(model) => TaskListResponse::from_model(model),
        None => TaskListResponse::failure(format!("{operation} failed: nothing rendered")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| std::env::temp_dir().join(DB_FILE_NAME))
        .clone()
}

fn to_row_item(row: tasklist_core::TaskRow) -> TaskRowItem {
    TaskRowItem {
        id: row.id.to_string(),
        text: row.text,
        completed: row.completed,
        toggle_glyph: row.toggle.glyph.to_string(),
        toggle_title: row.toggle.title.to_string(),
        delete_glyph: row.delete.glyph.to_string(),
        delete_title: row.delete.title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, init_logging, ping, task_add, task_delete, task_toggle,
        tasks_clear_completed, tasks_load,
    };
    use std::sync::{Mutex, MutexGuard, OnceLock};

    static TEST_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    // All tests share one process-wide db path; serialize and reset per test.
    fn isolated_db() -> MutexGuard<'static, ()> {
        let guard = TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = TEST_DIR.get_or_init(|| tempfile::tempdir().unwrap());
        let path = dir.path().join("ffi.sqlite3");
        assert_eq!(configure_db_path(path.to_str().unwrap().to_string()), "");
        for row in tasks_load().rows {
            task_delete(row.id);
        }
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_db_path_rejects_switching() {
        let _guard = isolated_db();
        assert!(!configure_db_path("/somewhere/else.sqlite3".to_string()).is_empty());
        assert!(!configure_db_path("  ".to_string()).is_empty());
    }

    #[test]
    fn add_toggle_clear_round_trip_through_ffi() {
        let _guard = isolated_db();

        let added = task_add("  Buy milk ".to_string());
        assert!(added.ok, "{}", added.message);
        assert_eq!(added.rows.len(), 1);
        assert_eq!(added.rows[0].text, "Buy milk");
        assert_eq!(added.rows[0].toggle_glyph, "✓");
        assert_eq!(added.count_text, "1 of 1 active tasks");

        let id = added.rows[0].id.clone();
        let toggled = task_toggle(id);
        assert!(toggled.rows[0].completed);
        assert_eq!(toggled.rows[0].toggle_glyph, "⟲");
        assert_eq!(toggled.count_text, "0 of 1 active tasks");

        let reloaded = tasks_load();
        assert_eq!(reloaded, toggled);

        let cleared = tasks_clear_completed();
        assert!(cleared.ok);
        assert!(cleared.rows.is_empty());
        assert_eq!(cleared.count_text, "0 of 0 active tasks");
    }

    #[test]
    fn blank_add_and_unknown_ids_are_ignored() {
        let _guard = isolated_db();
        task_add("keep".to_string());

        let blank = task_add("   ".to_string());
        assert!(blank.ok);
        assert_eq!(blank.rows.len(), 1);

        let missing = task_delete("no-such-id".to_string());
        assert_eq!(missing.rows.len(), 1);
        assert_eq!(missing.rows[0].text, "keep");
    }
}
