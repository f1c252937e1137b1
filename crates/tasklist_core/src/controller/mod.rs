//! Task list controller.
//!
//! # Responsibility
//! - Own the in-memory task list for one session.
//! - Translate user actions into store mutations followed by a full render.
//!
//! # Invariants
//! - Every action ends with exactly one render, and every render persists.
//! - The list is replaced, never edited in place, by each mutation.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_repo::KeyValueStore;
use crate::store::ops;
use crate::store::task_store::{StoreResult, TaskStore};
use crate::view::{self, TaskView};
use log::{debug, info};

/// Session state wiring store, list and view together.
pub struct TaskController<S: KeyValueStore, V: TaskView> {
    tasks: Vec<Task>,
    store: TaskStore<S>,
    view: V,
}

impl<S: KeyValueStore, V: TaskView> TaskController<S, V> {
    /// Loads the persisted list, renders it and focuses the input.
    ///
    /// # Errors
    /// - Propagates load failures (including undecodable data) unchanged.
    pub fn start(store: TaskStore<S>, view: V) -> StoreResult<Self> {
        let tasks = store.load()?;
        let mut controller = Self { tasks, store, view };
        controller.render()?;
        controller.view.focus_input();
        info!(
            "event=controller_start module=controller status=ok count={}",
            controller.tasks.len()
        );
        Ok(controller)
    }

    /// Handles submission of the input field.
    ///
    /// Blank input creates nothing but still clears, refocuses and renders.
    pub fn submit(&mut self, input: &str) -> StoreResult<()> {
        let before = self.tasks.len();
        self.tasks = ops::add(&self.tasks, input);
        debug!(
            "event=task_add module=controller added={}",
            self.tasks.len() > before
        );
        self.view.clear_input();
        self.view.focus_input();
        self.render()
    }

    pub fn toggle(&mut self, id: &TaskId) -> StoreResult<()> {
        self.tasks = ops::toggle(&self.tasks, id);
        debug!("event=task_toggle module=controller id={id}");
        self.render()
    }

    pub fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        self.tasks = ops::delete(&self.tasks, id);
        debug!("event=task_delete module=controller id={id}");
        self.render()
    }

    pub fn clear_completed(&mut self) -> StoreResult<()> {
        let before = self.tasks.len();
        self.tasks = ops::clear_completed(&self.tasks);
        debug!(
            "event=tasks_clear_completed module=controller removed={}",
            before - self.tasks.len()
        );
        self.render()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable view access for host-only output (hints, help text).
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Consumes the controller, handing the view back to the host.
    pub fn into_view(self) -> V {
        self.view
    }

    fn render(&mut self) -> StoreResult<()> {
        let model = view::render(&self.tasks);
        self.view.render(&model);
        self.store.save(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskController;
    use crate::repo::kv_repo::MemoryKeyValueStore;
    use crate::store::task_store::TaskStore;
    use crate::view::{TaskView, ViewModel};

    #[derive(Default)]
    struct RecordingView {
        renders: usize,
        clears: usize,
        focuses: usize,
        last: Option<ViewModel>,
    }

    impl TaskView for RecordingView {
        fn render(&mut self, model: &ViewModel) {
            self.renders += 1;
            self.last = Some(model.clone());
        }

        fn clear_input(&mut self) {
            self.clears += 1;
        }

        fn focus_input(&mut self) {
            self.focuses += 1;
        }
    }

    #[test]
    fn start_renders_once_and_focuses_input() {
        let kv = MemoryKeyValueStore::new();
        let controller =
            TaskController::start(TaskStore::new(&kv), RecordingView::default()).unwrap();

        assert_eq!(controller.view().renders, 1);
        assert_eq!(controller.view().focuses, 1);
        assert_eq!(controller.view().clears, 0);
    }

    #[test]
    fn blank_submit_still_clears_and_rerenders() {
        let kv = MemoryKeyValueStore::new();
        let mut controller =
            TaskController::start(TaskStore::new(&kv), RecordingView::default()).unwrap();

        controller.submit("   ").unwrap();

        assert!(controller.tasks().is_empty());
        let view = controller.into_view();
        assert_eq!(view.renders, 2);
        assert_eq!(view.clears, 1);
        assert_eq!(view.focuses, 2);
        assert_eq!(view.last.unwrap().count_text, "0 of 0 active tasks");
    }
}
