//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the task store persists through.
//! - Isolate SQLite query details from store and controller orchestration.

pub mod kv_repo;
