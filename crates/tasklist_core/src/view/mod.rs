//! Declarative view model for the task list.
//!
//! # Responsibility
//! - Rebuild the complete visual description of the list on every render.
//! - Format the active-task counter.
//! - Define the seam hosts implement to display the model and own the input field.
//!
//! # Invariants
//! - `render` never patches a previous model; it always starts from scratch.
//! - Rows appear in list order (newest first).

use crate::model::task::{Task, TaskId};
use crate::store::ops::counts;

pub const TOGGLE_GLYPH_ACTIVE: &str = "✓";
pub const TOGGLE_GLYPH_COMPLETED: &str = "⟲";
pub const TOGGLE_TITLE: &str = "Mark as completed";
pub const DELETE_GLYPH: &str = "🗑";
pub const DELETE_TITLE: &str = "Remove task";

const ROW_CLASS: &str = "task";
const COMPLETED_CLASS: &str = "completed";

/// One rendered control (button) of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub glyph: &'static str,
    pub title: &'static str,
}

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// Style classes: `task`, plus `completed` for finished tasks.
    pub classes: Vec<&'static str>,
    pub toggle: Control,
    pub delete: Control,
}

/// Full view state produced by one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub rows: Vec<TaskRow>,
    pub remaining: usize,
    pub total: usize,
    pub count_text: String,
}

/// Host display surface driven by the controller.
pub trait TaskView {
    /// Replaces everything on screen with `model`.
    fn render(&mut self, model: &ViewModel);
    fn clear_input(&mut self);
    fn focus_input(&mut self);
}

/// Builds the view model for `tasks`.
pub fn render(tasks: &[Task]) -> ViewModel {
    let (remaining, total) = counts(tasks);
    ViewModel {
        rows: tasks.iter().map(render_row).collect(),
        remaining,
        total,
        count_text: format_count(remaining, total),
    }
}

/// Returns the counter line for `tasks`, e.g. `1 of 2 active tasks`.
pub fn update_count(tasks: &[Task]) -> String {
    let (remaining, total) = counts(tasks);
    format_count(remaining, total)
}

fn format_count(remaining: usize, total: usize) -> String {
    format!("{remaining} of {total} active tasks")
}

fn render_row(task: &Task) -> TaskRow {
    let mut classes = vec![ROW_CLASS];
    if task.completed {
        classes.push(COMPLETED_CLASS);
    }
    TaskRow {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        classes,
        toggle: Control {
            glyph: if task.completed {
                TOGGLE_GLYPH_COMPLETED
            } else {
                TOGGLE_GLYPH_ACTIVE
            },
            title: TOGGLE_TITLE,
        },
        delete: Control {
            glyph: DELETE_GLYPH,
            title: DELETE_TITLE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{render, update_count, TOGGLE_GLYPH_ACTIVE, TOGGLE_GLYPH_COMPLETED};
    use crate::model::task::{Task, TaskId};

    fn task(id: &str, text: &str, completed: bool) -> Task {
        Task {
            id: TaskId::from(id),
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn empty_list_renders_zero_counter() {
        let model = render(&[]);
        assert!(model.rows.is_empty());
        assert_eq!(model.count_text, "0 of 0 active tasks");
    }

    #[test]
    fn completed_rows_get_distinct_glyph_and_class() {
        let model = render(&[task("a", "Walk dog", false), task("b", "Buy milk", true)]);

        assert_eq!(model.rows[0].text, "Walk dog");
        assert_eq!(model.rows[0].toggle.glyph, TOGGLE_GLYPH_ACTIVE);
        assert_eq!(model.rows[0].classes, vec!["task"]);

        assert_eq!(model.rows[1].id, TaskId::from("b"));
        assert_eq!(model.rows[1].toggle.glyph, TOGGLE_GLYPH_COMPLETED);
        assert_eq!(model.rows[1].classes, vec!["task", "completed"]);
        assert_eq!(model.count_text, "1 of 2 active tasks");
    }

    #[test]
    fn update_count_matches_rendered_counter() {
        let tasks = [task("a", "x", true), task("b", "y", true), task("c", "z", false)];
        assert_eq!(update_count(&tasks), "1 of 3 active tasks");
        assert_eq!(update_count(&tasks), render(&tasks).count_text);
    }
}
