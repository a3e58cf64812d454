//! The composed school store.
//!
//! `SchoolStore` owns snapshot persistence plus the clock and is the single
//! implementor of every repository contract in `crate::repo`. It is built by
//! the host's composition root and passed by reference; there is no global
//! instance.

use super::snapshot_store::SnapshotStore;
use super::storage::{SnapshotStorage, SqliteSnapshotStorage};
use crate::bootstrap::BootstrapConfig;
use crate::clock::{Clock, SystemClock};
use crate::model::snapshot::Snapshot;
use crate::repo::RepoResult;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rusqlite::Connection;

pub struct SchoolStore<S: SnapshotStorage, C: Clock = SystemClock> {
    snapshots: SnapshotStore<S>,
    clock: C,
}

impl<'conn> SchoolStore<SqliteSnapshotStorage<'conn>, SystemClock> {
    /// Store over a migrated SQLite connection using wall-clock time.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(SqliteSnapshotStorage::new(conn), SystemClock)
    }
}

impl<S: SnapshotStorage, C: Clock> SchoolStore<S, C> {
    pub fn new(storage: S, clock: C) -> Self {
        Self {
            snapshots: SnapshotStore::new(storage),
            clock,
        }
    }

    pub fn with_bootstrap(storage: S, clock: C, bootstrap: BootstrapConfig) -> Self {
        Self {
            snapshots: SnapshotStore::with_bootstrap(storage, bootstrap),
            clock,
        }
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current snapshot (persisted or default).
    pub fn load(&self) -> Snapshot {
        self.snapshots.load()
    }

    /// Persists defaults if the backing storage is empty.
    pub fn initialize(&self) -> bool {
        self.snapshots.initialize()
    }

    /// Runs a read-only query against a freshly loaded snapshot.
    pub(crate) fn read<T>(&self, query: impl FnOnce(&Snapshot) -> T) -> T {
        let snapshot = self.snapshots.load();
        query(&snapshot)
    }

    /// Loads, applies one mutation, and persists the whole snapshot.
    ///
    /// Nothing is written when `mutation` returns an error.
    pub(crate) fn write<T>(
        &self,
        event: &'static str,
        mutation: impl FnOnce(&mut Snapshot, DateTime<Utc>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut snapshot = self.snapshots.load();
        let outcome = match mutation(&mut snapshot, self.clock.now()) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(
                    "event={event} module=repo status=rejected error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };
        if let Err(err) = self.snapshots.try_save(&snapshot) {
            error!("event={event} module=repo status=error error_code=persistence_failed error={err}");
            return Err(err.into());
        }
        info!("event={event} module=repo status=ok");
        Ok(outcome)
    }
}
