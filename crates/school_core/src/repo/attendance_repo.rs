//! Attendance repository contract and snapshot implementation.
//!
//! # Invariants
//! - Marking is an upsert on `(student_id, date)`: the previous record is
//!   removed and the new one appended, so repeated marks are idempotent.
//! - Only students present in the snapshot can be marked.
//! - Class views join through the current roster on every call; there is no
//!   cached index.

use super::{EntityKind, RepoError, RepoResult};
use crate::clock::Clock;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::snapshot::Snapshot;
use crate::model::ClassNumber;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;
use chrono::NaiveDate;

pub trait AttendanceRepository {
    /// Upserts one student's mark for `date`.
    fn mark_attendance(
        &self,
        student_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> RepoResult<()>;
    /// Upserts a whole attendance sheet for `date` in one write.
    ///
    /// Fails without writing anything if any student is unknown.
    fn mark_attendance_sheet(
        &self,
        date: NaiveDate,
        marks: &[(String, AttendanceStatus)],
    ) -> RepoResult<usize>;
    /// One student's records in insertion order.
    fn attendance_for_student(&self, student_id: &str) -> Vec<AttendanceRecord>;
    /// Records of every student currently in `class`.
    fn attendance_for_class(&self, class: ClassNumber) -> Vec<AttendanceRecord>;
    /// All records for one calendar day.
    fn attendance_on(&self, date: NaiveDate) -> Vec<AttendanceRecord>;
}

impl<S: SnapshotStorage, C: Clock> AttendanceRepository for SchoolStore<S, C> {
    fn mark_attendance(
        &self,
        student_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> RepoResult<()> {
        let record = AttendanceRecord::new(student_id, date, status);
        record.validate()?;
        self.write("attendance_mark", |snapshot, _| {
            upsert_attendance(snapshot, record)
        })
    }

    fn mark_attendance_sheet(
        &self,
        date: NaiveDate,
        marks: &[(String, AttendanceStatus)],
    ) -> RepoResult<usize> {
        let records = marks
            .iter()
            .map(|(student_id, status)| {
                let record = AttendanceRecord::new(student_id.as_str(), date, *status);
                record.validate().map(|()| record)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.write("attendance_mark_sheet", |snapshot, _| {
            let count = records.len();
            for record in records {
                upsert_attendance(snapshot, record)?;
            }
            Ok(count)
        })
    }

    fn attendance_for_student(&self, student_id: &str) -> Vec<AttendanceRecord> {
        self.read(|snapshot| {
            snapshot
                .attendance
                .iter()
                .filter(|record| record.student_id == student_id)
                .cloned()
                .collect()
        })
    }

    fn attendance_for_class(&self, class: ClassNumber) -> Vec<AttendanceRecord> {
        self.read(|snapshot| {
            let roster = snapshot.class_roster_ids(class);
            snapshot
                .attendance
                .iter()
                .filter(|record| roster.contains(record.student_id.as_str()))
                .cloned()
                .collect()
        })
    }

    fn attendance_on(&self, date: NaiveDate) -> Vec<AttendanceRecord> {
        self.read(|snapshot| {
            snapshot
                .attendance
                .iter()
                .filter(|record| record.date == date)
                .cloned()
                .collect()
        })
    }
}

fn upsert_attendance(snapshot: &mut Snapshot, record: AttendanceRecord) -> RepoResult<()> {
    if snapshot.student(&record.student_id).is_none() {
        return Err(RepoError::not_found(
            EntityKind::Student,
            record.student_id.as_str(),
        ));
    }
    snapshot
        .attendance
        .retain(|existing| !existing.matches_key(&record.student_id, record.date));
    snapshot.attendance.push(record);
    Ok(())
}
