//! Assignments and student submissions.
//!
//! # Invariants
//! - `assignment_id` is allocated by the store on creation and never reused.
//! - At most one submission exists per `(assignment_id, student_id)`.
//! - `submitted_at` is always the store clock time of the last submit call.

use super::validation::{require_class, require_non_blank, ValidationError};
use super::ClassNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Overwritten by the store on creation.
    pub assignment_id: String,
    #[serde(rename = "class")]
    pub class: ClassNumber,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    /// Optional attachment shipped with the assignment brief.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Assignment {
    /// Builds an assignment draft; the id is assigned by `create_assignment`.
    pub fn draft(
        class: ClassNumber,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            assignment_id: String::new(),
            class,
            title: title.into(),
            description: description.into(),
            deadline,
            file_url: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_class(self.class)
    }

    /// Strict wall-clock comparison; an assignment due exactly `now` is not overdue.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub assignment_id: String,
    pub student_id: String,
    pub file_url: String,
    /// Stamped by the store; any caller-provided value is replaced.
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        assignment_id: impl Into<String>,
        student_id: impl Into<String>,
        file_url: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            student_id: student_id.into(),
            file_url: file_url.into(),
            submitted_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("assignmentId", &self.assignment_id)?;
        require_non_blank("studentId", &self.student_id)
    }

    pub fn matches_key(&self, assignment_id: &str, student_id: &str) -> bool {
        self.assignment_id == assignment_id && self.student_id == student_id
    }
}

/// Builds the storage path used for an uploaded submission file.
pub fn submission_file_url(student_id: &str, assignment_id: &str, file_name: &str) -> String {
    format!("uploads/{student_id}_{assignment_id}_{file_name}")
}
