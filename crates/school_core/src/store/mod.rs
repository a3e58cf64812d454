//! Snapshot persistence and the composed school store.
//!
//! # Responsibility
//! - Load and save the aggregate snapshot as one JSON document.
//! - Fall back to deterministic defaults when nothing usable is persisted.
//! - Compose persistence and clock into `SchoolStore`, the object every
//!   repository contract is implemented on.
//!
//! # Invariants
//! - Every mutation is read-entire-snapshot, mutate, write-entire-snapshot.
//! - Loading never fails; saving reports failure as a value.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod school_store;
pub mod snapshot_store;
pub mod storage;

/// Backend failure while reading or writing the raw payload.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "snapshot storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist a snapshot.
#[derive(Debug)]
pub enum StoreError {
    Serialize(serde_json::Error),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize snapshot: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
