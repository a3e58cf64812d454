//! Assignment and submission repository contract and snapshot implementation.
//!
//! # Invariants
//! - `assignment_id` is allocated by the store (`assign_<millis>`), unique
//!   within the snapshot regardless of clock resolution.
//! - Submitting is an upsert on `(assignment_id, student_id)` and always stamps
//!   `submitted_at` with the store clock.
//! - A submission must reference an existing assignment and student.

use super::{EntityKind, RepoError, RepoResult};
use crate::clock::Clock;
use crate::ids::{allocate_timestamp_id, ASSIGNMENT_ID_PREFIX};
use crate::model::coursework::{Assignment, Submission};
use crate::model::ClassNumber;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;

pub trait CourseworkRepository {
    /// Stores a new assignment and returns its allocated id.
    ///
    /// Any `assignment_id` on the input is ignored.
    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<String>;
    fn get_assignment(&self, assignment_id: &str) -> Option<Assignment>;
    fn list_assignments_by_class(&self, class: ClassNumber) -> Vec<Assignment>;
    /// Upserts a submission and returns the stored row.
    fn submit_assignment(&self, submission: &Submission) -> RepoResult<Submission>;
    fn submissions_for_assignment(&self, assignment_id: &str) -> Vec<Submission>;
    fn submissions_by_student(&self, student_id: &str) -> Vec<Submission>;
}

impl<S: SnapshotStorage, C: Clock> CourseworkRepository for SchoolStore<S, C> {
    fn create_assignment(&self, assignment: &Assignment) -> RepoResult<String> {
        assignment.validate()?;
        self.write("assignment_create", |snapshot, now| {
            let assignment_id = allocate_timestamp_id(
                ASSIGNMENT_ID_PREFIX,
                now,
                snapshot
                    .assignments
                    .iter()
                    .map(|existing| existing.assignment_id.as_str()),
            );
            let mut stored = assignment.clone();
            stored.assignment_id = assignment_id.clone();
            snapshot.assignments.push(stored);
            Ok(assignment_id)
        })
    }

    fn get_assignment(&self, assignment_id: &str) -> Option<Assignment> {
        self.read(|snapshot| snapshot.assignment(assignment_id).cloned())
    }

    fn list_assignments_by_class(&self, class: ClassNumber) -> Vec<Assignment> {
        self.read(|snapshot| {
            snapshot
                .assignments
                .iter()
                .filter(|assignment| assignment.class == class)
                .cloned()
                .collect()
        })
    }

    fn submit_assignment(&self, submission: &Submission) -> RepoResult<Submission> {
        submission.validate()?;
        self.write("assignment_submit", |snapshot, now| {
            if snapshot.assignment(&submission.assignment_id).is_none() {
                return Err(RepoError::not_found(
                    EntityKind::Assignment,
                    submission.assignment_id.as_str(),
                ));
            }
            if snapshot.student(&submission.student_id).is_none() {
                return Err(RepoError::not_found(
                    EntityKind::Student,
                    submission.student_id.as_str(),
                ));
            }

            snapshot.submissions.retain(|existing| {
                !existing.matches_key(&submission.assignment_id, &submission.student_id)
            });
            let mut stored = submission.clone();
            stored.submitted_at = now;
            snapshot.submissions.push(stored.clone());
            Ok(stored)
        })
    }

    fn submissions_for_assignment(&self, assignment_id: &str) -> Vec<Submission> {
        self.read(|snapshot| {
            snapshot
                .submissions
                .iter()
                .filter(|submission| submission.assignment_id == assignment_id)
                .cloned()
                .collect()
        })
    }

    fn submissions_by_student(&self, student_id: &str) -> Vec<Submission> {
        self.read(|snapshot| {
            snapshot
                .submissions
                .iter()
                .filter(|submission| submission.student_id == student_id)
                .cloned()
                .collect()
        })
    }
}
