//! Raw payload backends for the serialized snapshot.
//!
//! # Responsibility
//! - Read and write one opaque JSON payload under a fixed storage key.
//! - Leave SQL to `crate::db::snapshots`.
//!
//! # Invariants
//! - A write replaces the whole payload in one statement; readers never see a
//!   partially written snapshot.
//! - Absence of a payload is `Ok(None)`, not an error.

use super::StorageError;
use crate::db::snapshots::{read_snapshot, snapshot_revision, upsert_snapshot};
use log::debug;
use rusqlite::Connection;
use std::cell::RefCell;

/// Storage key of the school snapshot row.
pub const SNAPSHOT_STORAGE_KEY: &str = "school_management_data";

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend contract for snapshot payload persistence.
pub trait SnapshotStorage {
    /// Returns the stored payload, or `None` when nothing was written yet.
    fn read_payload(&self) -> StorageResult<Option<String>>;
    /// Replaces the stored payload atomically.
    fn write_payload(&self, payload: &str) -> StorageResult<()>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for &S {
    fn read_payload(&self) -> StorageResult<Option<String>> {
        (**self).read_payload()
    }

    fn write_payload(&self, payload: &str) -> StorageResult<()> {
        (**self).write_payload(payload)
    }
}

/// SQLite-backed payload storage (one row in `snapshots`).
pub struct SqliteSnapshotStorage<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteSnapshotStorage<'conn> {
    /// Uses the default storage key on a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, SNAPSHOT_STORAGE_KEY)
    }

    /// Uses a custom storage key, e.g. one snapshot per school.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Number of successful writes for this key; `0` when never written.
    pub fn revision(&self) -> StorageResult<i64> {
        Ok(snapshot_revision(self.conn, &self.key)?)
    }
}

impl SnapshotStorage for SqliteSnapshotStorage<'_> {
    fn read_payload(&self) -> StorageResult<Option<String>> {
        let row = read_snapshot(self.conn, &self.key)?;
        Ok(row.map(|row| row.payload))
    }

    fn write_payload(&self, payload: &str) -> StorageResult<()> {
        let revision = upsert_snapshot(self.conn, &self.key, payload)?;
        debug!(
            "event=snapshot_write module=store status=ok key={} revision={revision}",
            self.key
        );
        Ok(())
    }
}

/// Process-local payload storage for hosts without a database.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    payload: RefCell<Option<String>>,
    reads: RefCell<u64>,
    writes: RefCell<u64>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing payload, e.g. a document imported from disk.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(payload.into())),
            ..Self::default()
        }
    }

    /// Number of payload reads, including reads that found nothing.
    pub fn read_count(&self) -> u64 {
        *self.reads.borrow()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> u64 {
        *self.writes.borrow()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn read_payload(&self) -> StorageResult<Option<String>> {
        *self.reads.borrow_mut() += 1;
        Ok(self.payload.borrow().clone())
    }

    fn write_payload(&self, payload: &str) -> StorageResult<()> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
