//! Task domain model.
//!
//! # Responsibility
//! - Define the single record persisted and rendered by the task list.
//! - Generate opaque task ids at creation time.
//!
//! # Invariants
//! - `id` is never empty and is never reused for another task.
//! - `text` is trimmed and never empty or whitespace-only.
//! - `completed` starts as `false`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ID_RANDOM_SUFFIX_CHARS: usize = 5;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque task identifier.
///
/// Serialized as a bare string to match the persisted list format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh id: epoch milliseconds in base 36 followed by a
    /// short random base-36 suffix.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        let mut id = to_base36(millis);
        let mut random = Uuid::new_v4().as_u128();
        for _ in 0..ID_RANDOM_SUFFIX_CHARS {
            id.push(char::from(BASE36_DIGITS[(random % 36) as usize]));
            random /= 36;
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single to-do entry.
///
/// Field order matches the persisted record shape: `id`, `text`, `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Creates an active task from raw user input.
    ///
    /// Returns `None` when the input is empty after trimming.
    pub fn new(text: &str) -> Option<Self> {
        Self::with_id(TaskId::generate(), text)
    }

    /// Creates an active task with a caller-provided id.
    ///
    /// Returns `None` when the input is empty after trimming.
    pub fn with_id(id: TaskId, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            id,
            text: trimmed.to_string(),
            completed: false,
        })
    }

    /// Returns whether this task still counts as active.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::{to_base36, Task, TaskId};
    use std::collections::HashSet;

    #[test]
    fn to_base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn generated_ids_are_lowercase_base36_and_distinct() {
        let ids = (0..200).map(|_| TaskId::generate()).collect::<Vec<_>>();
        for id in &ids {
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
            assert!(id.as_str().len() > 5);
        }
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn new_trims_text_and_rejects_blank_input() {
        let task = Task::new("  Buy milk \n").expect("non-blank text should create a task");
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);

        assert!(Task::new("").is_none());
        assert!(Task::new(" \t\n ").is_none());
    }

    #[test]
    fn with_id_keeps_the_given_id() {
        let task = Task::with_id(TaskId::from("a1"), " ok ").unwrap();
        assert_eq!(task.id.as_str(), "a1");
        assert_eq!(task.text, "ok");
        assert!(Task::with_id(TaskId::from("a2"), "  ").is_none());
    }
}
