//! Versioned schema for the snapshot database.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per entry.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Pending steps run in one transaction; a failure leaves the old version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "snapshots",
    sql: include_str!("0001_snapshots.sql"),
}];

/// Version range covered by one `apply_migrations` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationOutcome {
    /// Whether any schema step ran.
    pub fn changed(&self) -> bool {
        self.from_version != self.to_version
    }
}

/// Schema version this binary migrates to.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

/// Brings the schema up to `latest_version`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let outcome = MigrationOutcome {
        from_version,
        to_version: latest,
    };
    if !outcome.changed() {
        return Ok(outcome);
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        outcome.from_version, outcome.to_version
    );
    Ok(outcome)
}
