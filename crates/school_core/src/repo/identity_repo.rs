//! Admin/student credential lookup.
//!
//! Exact `(id, password)` equality over the current snapshot. A mismatch is an
//! ordinary `None`. This is a placeholder check, not a security mechanism.

use crate::clock::Clock;
use crate::model::identity::{Admin, Student};
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;
use log::info;

pub trait IdentityLookup {
    fn authenticate_admin(&self, admin_id: &str, password: &str) -> Option<Admin>;
    fn authenticate_student(&self, student_id: &str, password: &str) -> Option<Student>;
}

impl<S: SnapshotStorage, C: Clock> IdentityLookup for SchoolStore<S, C> {
    fn authenticate_admin(&self, admin_id: &str, password: &str) -> Option<Admin> {
        let admin = self.read(|snapshot| {
            snapshot
                .admins
                .iter()
                .find(|admin| admin.admin_id == admin_id && admin.password == password)
                .cloned()
        });
        info!(
            "event=auth module=identity role=admin status={}",
            outcome_label(admin.is_some())
        );
        admin
    }

    fn authenticate_student(&self, student_id: &str, password: &str) -> Option<Student> {
        let student = self.read(|snapshot| {
            snapshot
                .students
                .iter()
                .find(|student| student.student_id == student_id && student.password == password)
                .cloned()
        });
        info!(
            "event=auth module=identity role=student status={}",
            outcome_label(student.is_some())
        );
        student
    }
}

fn outcome_label(matched: bool) -> &'static str {
    if matched {
        "ok"
    } else {
        "rejected"
    }
}
