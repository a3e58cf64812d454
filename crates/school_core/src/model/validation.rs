//! Minimal write-side validation shared by all records.
//!
//! The store only rejects values that would break a keyed invariant. Everything
//! else (empty descriptions, malformed optional emails) is accepted as-is and
//! left to the UI layer.

use super::{ClassNumber, MAX_CLASS, MIN_CLASS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TIME_SLOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d-([01]\d|2[0-3]):[0-5]\d$").expect("valid time slot regex")
});

/// Validation failure for a record about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key field is empty after trim.
    BlankField(&'static str),
    /// Class number is outside `MIN_CLASS..=MAX_CLASS`.
    ClassOutOfRange(ClassNumber),
    /// Time slot is not `HH:MM-HH:MM`.
    InvalidTimeSlot(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::ClassOutOfRange(class) => write!(
                f,
                "class {class} is out of range; expected {MIN_CLASS}..={MAX_CLASS}"
            ),
            Self::InvalidTimeSlot(slot) => {
                write!(f, "time slot `{slot}` must look like HH:MM-HH:MM")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_class(class: ClassNumber) -> Result<(), ValidationError> {
    if !super::is_valid_class(class) {
        return Err(ValidationError::ClassOutOfRange(class));
    }
    Ok(())
}

pub(crate) fn require_time_slot(slot: &str) -> Result<(), ValidationError> {
    if !TIME_SLOT_RE.is_match(slot) {
        return Err(ValidationError::InvalidTimeSlot(slot.to_string()));
    }
    Ok(())
}
