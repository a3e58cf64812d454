//! SQLite home of the school snapshot.
//!
//! # Responsibility
//! - Open connections with the schema migrated to the current version.
//! - Read and upsert snapshot rows through typed helpers, so SQL stays here.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Snapshot rows are touched only after migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod snapshots;

pub use migrations::MigrationOutcome;
pub use open::{open_db, open_db_in_memory};
pub use snapshots::SnapshotRow;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    BlankStorageKey,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "school database is at schema {db_version}; this build reads up to {latest_supported}"
            ),
            Self::BlankStorageKey => write!(f, "snapshot storage key must not be blank"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::BlankStorageKey => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
