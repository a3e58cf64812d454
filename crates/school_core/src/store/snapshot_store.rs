//! Load/save of the aggregate snapshot with default fallback.
//!
//! # Invariants
//! - `load` never fails: a missing or undecodable payload yields the bootstrap
//!   snapshot and nothing is written.
//! - `save` writes the whole snapshot or nothing, and reports failure as `false`.

use super::storage::SnapshotStorage;
use super::{StoreError, StoreResult};
use crate::bootstrap::{bootstrap_with, BootstrapConfig};
use crate::model::snapshot::Snapshot;
use log::{debug, error, warn};

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// Nothing was stored yet.
    DefaultMissing,
    /// A payload existed but could not be read or decoded.
    DefaultRecovered,
}

pub struct SnapshotStore<S: SnapshotStorage> {
    storage: S,
    bootstrap: BootstrapConfig,
}

impl<S: SnapshotStorage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_bootstrap(storage, BootstrapConfig::default())
    }

    pub fn with_bootstrap(storage: S, bootstrap: BootstrapConfig) -> Self {
        Self { storage, bootstrap }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the persisted snapshot or a fresh default one.
    pub fn load(&self) -> Snapshot {
        self.load_with_source().0
    }

    /// Same as `load`, also reporting whether defaults were substituted.
    pub fn load_with_source(&self) -> (Snapshot, LoadSource) {
        let payload = match self.storage.read_payload() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("event=snapshot_load module=store status=fallback reason=missing");
                return (self.bootstrap_default(), LoadSource::DefaultMissing);
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=fallback reason=read_failed error={err}"
                );
                return (self.bootstrap_default(), LoadSource::DefaultRecovered);
            }
        };

        match serde_json::from_str::<Snapshot>(&payload) {
            Ok(snapshot) => (snapshot, LoadSource::Persisted),
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=fallback reason=corrupt bytes={} error={err}",
                    payload.len()
                );
                (self.bootstrap_default(), LoadSource::DefaultRecovered)
            }
        }
    }

    /// Persists `snapshot`; `false` when serialization or the backend fails.
    pub fn save(&self, snapshot: &Snapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => true,
            Err(err) => {
                error!("event=snapshot_save module=store status=error error={err}");
                false
            }
        }
    }

    /// Persists `snapshot`, returning the typed failure.
    pub fn try_save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let payload = serde_json::to_string(snapshot).map_err(StoreError::from)?;
        self.storage.write_payload(&payload)?;
        debug!(
            "event=snapshot_save module=store status=ok bytes={}",
            payload.len()
        );
        Ok(())
    }

    /// Writes the default snapshot when nothing is stored yet.
    ///
    /// A stored but undecodable payload is left untouched. Returns `false` only
    /// when the storage could not be read or the write failed.
    pub fn initialize(&self) -> bool {
        match self.storage.read_payload() {
            Ok(Some(_)) => true,
            Ok(None) => self.save(&self.bootstrap_default()),
            Err(err) => {
                error!("event=snapshot_init module=store status=error error={err}");
                false
            }
        }
    }

    /// Pure default generator for this store's bootstrap config.
    pub fn bootstrap_default(&self) -> Snapshot {
        bootstrap_with(&self.bootstrap)
    }
}
