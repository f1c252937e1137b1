//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record used by store, view and controller.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the list; there are no tombstones.

pub mod task;
