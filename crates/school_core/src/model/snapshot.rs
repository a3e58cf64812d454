//! Aggregate snapshot holding every collection of the school store.
//!
//! # Responsibility
//! - Own all entity collections as one unit for read-modify-write.
//! - Provide key lookups shared by repositories and services.
//!
//! # Invariants
//! - Collections preserve insertion order.
//! - The snapshot is persisted and loaded as one JSON document.

use super::attendance::AttendanceRecord;
use super::coursework::{Assignment, Submission};
use super::identity::{Admin, Student};
use super::timetable::TimetableEntry;
use super::video::VideoLecture;
use super::ClassNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub videos: Vec<VideoLecture>,
    #[serde(default)]
    pub timetable: Vec<TimetableEntry>,
}

impl Snapshot {
    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|student| student.student_id == student_id)
    }

    pub fn student_mut(&mut self, student_id: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|student| student.student_id == student_id)
    }

    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.assignment_id == assignment_id)
    }

    pub fn students_in_class(&self, class: ClassNumber) -> impl Iterator<Item = &Student> {
        self.students
            .iter()
            .filter(move |student| student.class == class)
    }

    pub fn class_size(&self, class: ClassNumber) -> usize {
        self.students_in_class(class).count()
    }

    /// Current roster ids for one class; recomputed on every call.
    pub fn class_roster_ids(&self, class: ClassNumber) -> HashSet<&str> {
        self.students_in_class(class)
            .map(|student| student.student_id.as_str())
            .collect()
    }
}
