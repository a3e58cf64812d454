//! Student repository contract and snapshot implementation.
//!
//! # Invariants
//! - `student_id` is unique; adding an existing id is rejected.
//! - Deleting a student removes its attendance and submissions in the same
//!   write, so no orphaned rows survive.
//! - Updates replace one field on an existing row; a missing id is `NotFound`.

use super::{EntityKind, RepoError, RepoResult};
use crate::clock::Clock;
use crate::ids::next_student_id;
use crate::model::identity::Student;
use crate::model::snapshot::Snapshot;
use crate::model::validation::{require_class, require_non_blank};
use crate::model::ClassNumber;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;

/// Rows removed alongside a deleted student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub attendance_removed: usize,
    pub submissions_removed: usize,
}

pub trait StudentRepository {
    /// Appends a new student; rejects duplicate ids.
    fn add_student(&self, student: &Student) -> RepoResult<()>;
    /// Removes a student and every attendance/submission row keyed by it.
    fn delete_student(&self, student_id: &str) -> RepoResult<CascadeSummary>;
    fn update_student_class(&self, student_id: &str, new_class: ClassNumber) -> RepoResult<()>;
    fn update_student_password(&self, student_id: &str, new_password: &str) -> RepoResult<()>;
    /// Sets the parent email; `None` or a blank value clears it.
    fn update_parent_email(&self, student_id: &str, email: Option<&str>) -> RepoResult<()>;
    fn get_student(&self, student_id: &str) -> Option<Student>;
    fn list_students(&self) -> Vec<Student>;
    /// Students of one class in snapshot order.
    fn list_students_by_class(&self, class: ClassNumber) -> Vec<Student>;
    /// Students whose name contains `term` ignoring case, or whose id contains
    /// it verbatim, optionally limited to one class. An empty term matches all.
    fn search_students(&self, term: &str, class: Option<ClassNumber>) -> Vec<Student>;
    /// Next free generated id for `class` under the `year` prefix.
    fn suggest_student_id(&self, year: u16, class: ClassNumber) -> Option<String>;
}

impl<S: SnapshotStorage, C: Clock> StudentRepository for SchoolStore<S, C> {
    fn add_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;
        self.write("student_add", |snapshot, _| {
            if snapshot.student(&student.student_id).is_some() {
                return Err(RepoError::duplicate(
                    EntityKind::Student,
                    student.student_id.as_str(),
                ));
            }
            snapshot.students.push(student.clone());
            Ok(())
        })
    }

    fn delete_student(&self, student_id: &str) -> RepoResult<CascadeSummary> {
        self.write("student_delete", |snapshot, _| {
            remove_student_cascade(snapshot, student_id)
        })
    }

    fn update_student_class(&self, student_id: &str, new_class: ClassNumber) -> RepoResult<()> {
        require_class(new_class)?;
        self.write("student_update_class", |snapshot, _| {
            existing_student(snapshot, student_id)?.class = new_class;
            Ok(())
        })
    }

    fn update_student_password(&self, student_id: &str, new_password: &str) -> RepoResult<()> {
        require_non_blank("password", new_password)?;
        self.write("student_update_password", |snapshot, _| {
            existing_student(snapshot, student_id)?.password = new_password.to_string();
            Ok(())
        })
    }

    fn update_parent_email(&self, student_id: &str, email: Option<&str>) -> RepoResult<()> {
        let email = email
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self.write("student_update_parent_email", |snapshot, _| {
            existing_student(snapshot, student_id)?.parent_email = email;
            Ok(())
        })
    }

    fn get_student(&self, student_id: &str) -> Option<Student> {
        self.read(|snapshot| snapshot.student(student_id).cloned())
    }

    fn list_students(&self) -> Vec<Student> {
        self.read(|snapshot| snapshot.students.clone())
    }

    fn list_students_by_class(&self, class: ClassNumber) -> Vec<Student> {
        self.read(|snapshot| snapshot.students_in_class(class).cloned().collect())
    }

    fn search_students(&self, term: &str, class: Option<ClassNumber>) -> Vec<Student> {
        let lowered = term.to_lowercase();
        self.read(|snapshot| {
            snapshot
                .students
                .iter()
                .filter(|student| class.map_or(true, |class| student.class == class))
                .filter(|student| {
                    student.name.to_lowercase().contains(&lowered)
                        || student.student_id.contains(term)
                })
                .cloned()
                .collect()
        })
    }

    fn suggest_student_id(&self, year: u16, class: ClassNumber) -> Option<String> {
        self.read(|snapshot| {
            next_student_id(
                snapshot
                    .students
                    .iter()
                    .map(|student| student.student_id.as_str()),
                year,
                class,
            )
        })
    }
}

fn existing_student<'s>(
    snapshot: &'s mut Snapshot,
    student_id: &str,
) -> RepoResult<&'s mut Student> {
    snapshot
        .student_mut(student_id)
        .ok_or_else(|| RepoError::not_found(EntityKind::Student, student_id))
}

fn remove_student_cascade(snapshot: &mut Snapshot, student_id: &str) -> RepoResult<CascadeSummary> {
    let before = snapshot.students.len();
    snapshot
        .students
        .retain(|student| student.student_id != student_id);
    if snapshot.students.len() == before {
        return Err(RepoError::not_found(EntityKind::Student, student_id));
    }

    let attendance_before = snapshot.attendance.len();
    snapshot
        .attendance
        .retain(|record| record.student_id != student_id);
    let submissions_before = snapshot.submissions.len();
    snapshot
        .submissions
        .retain(|submission| submission.student_id != student_id);

    Ok(CascadeSummary {
        attendance_removed: attendance_before - snapshot.attendance.len(),
        submissions_removed: submissions_before - snapshot.submissions.len(),
    })
}
