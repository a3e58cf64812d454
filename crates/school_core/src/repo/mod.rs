//! Repository contracts for every entity kind.
//!
//! # Responsibility
//! - Define use-case oriented read/write contracts per entity kind.
//! - Enforce keyed invariants (uniqueness, upsert, cascade, partition replace).
//!
//! # Invariants
//! - Every write is validated before the snapshot is persisted.
//! - A failed write persists nothing.
//! - Missing keys surface as `RepoError::NotFound`, never as a panic.

use crate::model::validation::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance_repo;
pub mod coursework_repo;
pub mod identity_repo;
pub mod student_repo;
pub mod timetable_repo;
pub mod video_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kind named in repository errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Attendance,
    Assignment,
    Submission,
    Video,
    TimetableEntry,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Attendance => "attendance",
            Self::Assignment => "assignment",
            Self::Submission => "submission",
            Self::Video => "video",
            Self::TimetableEntry => "timetable entry",
        }
    }
}

/// Repository error for snapshot-backed entity operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound { entity: EntityKind, key: String },
    Duplicate { entity: EntityKind, key: String },
    Persistence(StoreError),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn duplicate(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    /// Short machine-readable code for FFI/UI mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::Duplicate { .. } => "duplicate_key",
            Self::Persistence(_) => "persistence_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{} not found: {key}", entity.as_str()),
            Self::Duplicate { entity, key } => {
                write!(f, "{} already exists: {key}", entity.as_str())
            }
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound { .. } | Self::Duplicate { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}
