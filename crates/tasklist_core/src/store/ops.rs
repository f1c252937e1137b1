//! Pure task list mutations.
//!
//! Every function takes the current list by reference and returns the
//! replacement list. Unknown ids and blank input are no-ops, not errors.

use crate::model::task::{Task, TaskId};

/// Prepends a new active task built from `text`.
///
/// Returns an unchanged copy when `text` is empty after trimming.
pub fn add(list: &[Task], text: &str) -> Vec<Task> {
    match Task::new(text) {
        Some(task) => std::iter::once(task).chain(list.iter().cloned()).collect(),
        None => list.to_vec(),
    }
}

/// Inverts `completed` on the task matching `id`.
pub fn toggle(list: &[Task], id: &TaskId) -> Vec<Task> {
    list.iter()
        .map(|task| {
            if &task.id == id {
                Task {
                    completed: !task.completed,
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

/// Removes the task matching `id`.
pub fn delete(list: &[Task], id: &TaskId) -> Vec<Task> {
    list.iter().filter(|task| &task.id != id).cloned().collect()
}

/// Keeps only active tasks.
pub fn clear_completed(list: &[Task]) -> Vec<Task> {
    list.iter().filter(|task| task.is_active()).cloned().collect()
}

/// Returns `(remaining, total)` where `remaining` counts active tasks.
pub fn counts(list: &[Task]) -> (usize, usize) {
    let remaining = list.iter().filter(|task| task.is_active()).count();
    (remaining, list.len())
}
