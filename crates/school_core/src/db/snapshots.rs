//! Typed access to the `snapshots` table.
//!
//! # Invariants
//! - One row per storage key; `revision` counts successful upserts of that key.
//! - Blank storage keys are rejected before any SQL runs.

use super::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// One persisted snapshot document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub storage_key: String,
    pub payload: String,
    /// Epoch millis of the last write, second precision.
    pub updated_at: i64,
    pub revision: i64,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            storage_key: row.get(0)?,
            payload: row.get(1)?,
            updated_at: row.get(2)?,
            revision: row.get(3)?,
        })
    }
}

/// Loads the row stored under `key`.
pub fn read_snapshot(conn: &Connection, key: &str) -> DbResult<Option<SnapshotRow>> {
    let key = checked_key(key)?;
    let row = conn
        .query_row(
            "SELECT storage_key, payload, updated_at, revision
             FROM snapshots
             WHERE storage_key = ?1;",
            params![key],
            SnapshotRow::from_row,
        )
        .optional()?;
    Ok(row)
}

/// Inserts or replaces the payload under `key` in one statement and returns
/// the new revision.
pub fn upsert_snapshot(conn: &Connection, key: &str, payload: &str) -> DbResult<i64> {
    let key = checked_key(key)?;
    let revision = conn.query_row(
        "INSERT INTO snapshots (storage_key, payload, revision)
         VALUES (?1, ?2, 1)
         ON CONFLICT(storage_key) DO UPDATE SET
            payload = excluded.payload,
            updated_at = excluded.updated_at,
            revision = snapshots.revision + 1
         RETURNING revision;",
        params![key, payload],
        |row| row.get(0),
    )?;
    Ok(revision)
}

/// Revision of `key`; `0` when nothing was written yet.
pub fn snapshot_revision(conn: &Connection, key: &str) -> DbResult<i64> {
    let key = checked_key(key)?;
    let revision = conn
        .query_row(
            "SELECT revision FROM snapshots WHERE storage_key = ?1;",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(revision.unwrap_or(0))
}

fn checked_key(key: &str) -> DbResult<&str> {
    if key.trim().is_empty() {
        return Err(DbError::BlankStorageKey);
    }
    Ok(key)
}
