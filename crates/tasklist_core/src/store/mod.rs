//! Task store: pure list mutations plus key-value persistence.
//!
//! # Responsibility
//! - `ops` produces replacement lists for add/toggle/delete/clear.
//! - `task_store` loads and saves the list under a fixed key.
//!
//! # Invariants
//! - New tasks are prepended; no other reordering happens.
//! - Task ids stay pairwise distinct across all mutations.

pub mod ops;
pub mod task_store;
