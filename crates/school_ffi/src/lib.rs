//! Flutter-facing bindings for the school core.

pub mod api;
