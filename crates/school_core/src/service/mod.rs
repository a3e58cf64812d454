//! Read-side services built on top of the repository contracts.
//!
//! # Responsibility
//! - Derive dashboards, reports and projections from repository reads.
//! - Keep UI/FFI layers decoupled from snapshot layout.

pub mod schedule;
pub mod school_service;
pub mod stats;
