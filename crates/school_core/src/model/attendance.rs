//! Daily attendance records.
//!
//! # Invariants
//! - At most one record exists per `(student_id, date)`.

use super::validation::{require_non_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attendance mark for one student on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(student_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            status,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("studentId", &self.student_id)
    }

    /// Returns whether this record occupies the `(student_id, date)` slot.
    pub fn matches_key(&self, student_id: &str, date: NaiveDate) -> bool {
        self.student_id == student_id && self.date == date
    }
}
