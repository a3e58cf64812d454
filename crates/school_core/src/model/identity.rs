//! Admin and student identities.
//!
//! # Invariants
//! - `admin_id` and `student_id` are unique within a snapshot.
//! - `password` is stored and compared verbatim. It is a placeholder credential,
//!   not a security boundary.

use super::validation::{require_class, require_non_blank, ValidationError};
use super::ClassNumber;
use serde::{Deserialize, Serialize};

/// School administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub admin_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// `<year:4><class:2><ordinal:2>` for generated students; free-form otherwise.
    pub student_id: String,
    pub name: String,
    /// Serialized as `class` to match the persisted document.
    #[serde(rename = "class")]
    pub class: ClassNumber,
    pub password: String,
    /// Recipient for parent reports. Never validated by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
}

impl Student {
    /// Creates a student without a parent email.
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        class: ClassNumber,
        password: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            class,
            password: password.into(),
            parent_email: None,
        }
    }

    /// Checks the key and class constraints enforced on every write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("studentId", &self.student_id)?;
        require_class(self.class)
    }

    /// Returns whether a usable parent email is on file.
    pub fn has_parent_email(&self) -> bool {
        self.parent_email
            .as_deref()
            .is_some_and(|email| !email.trim().is_empty())
    }
}
