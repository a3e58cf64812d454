//! Core domain logic for the school management app.
//! This crate is the single source of truth for school records and the
//! rules that keep them consistent.

pub mod bootstrap;
pub mod clock;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use bootstrap::{bootstrap_default, bootstrap_with, BootstrapConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{AttendanceRecord, AttendanceStatus};
pub use model::coursework::{Assignment, Submission};
pub use model::identity::{Admin, Student};
pub use model::snapshot::Snapshot;
pub use model::timetable::{TimetableEntry, Weekday};
pub use model::validation::ValidationError;
pub use model::video::VideoLecture;
pub use model::ClassNumber;
pub use repo::attendance_repo::AttendanceRepository;
pub use repo::coursework_repo::CourseworkRepository;
pub use repo::identity_repo::IdentityLookup;
pub use repo::student_repo::{CascadeSummary, StudentRepository};
pub use repo::timetable_repo::TimetableRepository;
pub use repo::video_repo::VideoRepository;
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::school_service::{SchoolRepository, SchoolService};
pub use store::school_store::SchoolStore;
pub use store::snapshot_store::{LoadSource, SnapshotStore};
pub use store::storage::{MemorySnapshotStorage, SnapshotStorage, SqliteSnapshotStorage};
pub use store::{StorageError, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
