//! Deterministic default data for a store with no persisted snapshot.
//!
//! # Invariants
//! - Output depends only on `BootstrapConfig`; no clock or randomness is read.
//! - Student ordering is class-major, ordinal-minor.

use crate::ids::student_id;
use crate::model::identity::{Admin, Student};
use crate::model::snapshot::Snapshot;
use crate::model::timetable::{TimetableEntry, Weekday};
use crate::model::ClassNumber;

pub const DEFAULT_ADMIN_ID: &str = "admin001";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_STUDENT_PASSWORD: &str = "student123";

const DEFAULT_ADMIN_NAME: &str = "School Administrator";
const DEFAULT_ADMIN_EMAIL: &str = "admin@school.com";

const STUDENT_NAMES: [&str; 20] = [
    "Aarav", "Vivaan", "Aditya", "Vihaan", "Arjun", "Sai", "Reyansh", "Krishna", "Ishaan",
    "Shaurya", "Aditi", "Ananya", "Aadhya", "Kiara", "Diya", "Saanvi", "Aarohi", "Kavya", "Myra",
    "Pihu",
];

pub const DEFAULT_TIME_SLOTS: [&str; 5] = [
    "09:00-10:00",
    "10:00-11:00",
    "11:30-12:30",
    "12:30-13:30",
    "14:30-15:30",
];

const SUBJECTS: [&str; 7] = [
    "Mathematics",
    "English",
    "Science",
    "Social Studies",
    "Hindi",
    "Art",
    "Physical Education",
];

const TEACHERS: [&str; 7] = [
    "Ms. Sharma",
    "Mr. Kumar",
    "Ms. Patel",
    "Mr. Singh",
    "Ms. Gupta",
    "Mr. Verma",
    "Ms. Joshi",
];

/// Shape of the generated default school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Four-digit year prefix of generated student ids.
    pub year: u16,
    /// Classes `1..=class_count` are populated.
    pub class_count: ClassNumber,
    pub students_per_class: u8,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            class_count: crate::model::MAX_CLASS,
            students_per_class: 20,
        }
    }
}

/// Builds the default snapshot with the default configuration.
pub fn bootstrap_default() -> Snapshot {
    bootstrap_with(&BootstrapConfig::default())
}

/// Builds a default snapshot for `config`.
pub fn bootstrap_with(config: &BootstrapConfig) -> Snapshot {
    Snapshot {
        admins: vec![default_admin()],
        students: default_students(config),
        timetable: default_timetable(config.class_count),
        ..Snapshot::default()
    }
}

fn default_admin() -> Admin {
    Admin {
        admin_id: DEFAULT_ADMIN_ID.to_string(),
        name: DEFAULT_ADMIN_NAME.to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
    }
}

fn default_students(config: &BootstrapConfig) -> Vec<Student> {
    let capacity = usize::from(config.class_count) * usize::from(config.students_per_class);
    let mut students = Vec::with_capacity(capacity);
    for class in 1..=config.class_count {
        for ordinal in 1..=config.students_per_class {
            let name = STUDENT_NAMES[usize::from(ordinal - 1) % STUDENT_NAMES.len()];
            students.push(Student::new(
                student_id(config.year, class, ordinal),
                format!("{name} (Class {class})"),
                class,
                DEFAULT_STUDENT_PASSWORD,
            ));
        }
    }
    students
}

/// Default week for `1..=class_count`: every school day gets the same slot plan.
pub fn default_timetable(class_count: ClassNumber) -> Vec<TimetableEntry> {
    let mut entries = Vec::new();
    for class in 1..=class_count {
        entries.extend(default_class_timetable(class));
    }
    entries
}

/// Default week for a single class.
pub fn default_class_timetable(class: ClassNumber) -> Vec<TimetableEntry> {
    class_week(class, |_, slot_index| slot_index)
}

/// Week for one class where subjects keep rotating across days instead of
/// restarting every morning. Backs the per-class "generate default" action.
pub fn rotating_class_timetable(class: ClassNumber) -> Vec<TimetableEntry> {
    class_week(class, |day_index, slot_index| {
        day_index * DEFAULT_TIME_SLOTS.len() + slot_index
    })
}

fn class_week(
    class: ClassNumber,
    position: impl Fn(usize, usize) -> usize,
) -> Vec<TimetableEntry> {
    let mut entries = Vec::with_capacity(Weekday::SCHOOL_DAYS.len() * DEFAULT_TIME_SLOTS.len());
    for (day_index, day) in Weekday::SCHOOL_DAYS.into_iter().enumerate() {
        for (slot_index, slot) in DEFAULT_TIME_SLOTS.iter().enumerate() {
            let index = position(day_index, slot_index);
            entries.push(TimetableEntry::new(
                class,
                day,
                *slot,
                SUBJECTS[index % SUBJECTS.len()],
                TEACHERS[index % TEACHERS.len()],
            ));
        }
    }
    entries
}
