//! Flutter-facing bindings for the tasklist core.
//! Functions in `api` are scanned by `flutter_rust_bridge_codegen`.

pub mod api;
