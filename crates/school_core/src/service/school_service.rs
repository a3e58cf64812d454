//! Derived read views for dashboards, parent reports and the chat assistant.
//!
//! # Responsibility
//! - Combine repository reads into the aggregates UI collaborators render.
//! - Keep formatting out: every view is plain data, serializable to JSON.
//!
//! # Invariants
//! - Every view loads the snapshot exactly once and is recomputed on each call.
//! - `overdue` is evaluated against the repository clock at read time.
//! - Projections never expose student passwords.

use super::schedule::TimetableGrid;
use super::stats::{rounded_percent, AttendanceSummary, SubmissionStats};
use crate::clock::Clock;
use crate::model::attendance::AttendanceRecord;
use crate::model::coursework::{Assignment, Submission};
use crate::model::identity::Student;
use crate::model::snapshot::Snapshot;
use crate::model::timetable::{TimetableEntry, Weekday};
use crate::model::video::VideoLecture;
use crate::model::{all_classes, ClassNumber};
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::coursework_repo::CourseworkRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::timetable_repo::TimetableRepository;
use crate::repo::video_repo::VideoRepository;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

const REPORT_WINDOW_DAYS: i64 = 30;
const TREND_SAMPLE_SIZE: usize = 7;
const TREND_THRESHOLD_POINTS: f64 = 5.0;
const LOW_ATTENDANCE_PERCENT: f64 = 75.0;
const PENDING_ASSIGNMENT_RATIO: f64 = 0.3;

pub const FOCUS_IMPROVE_ATTENDANCE: &str = "Improve Attendance";
pub const FOCUS_PENDING_ASSIGNMENTS: &str = "Complete Pending Assignments";
pub const FOCUS_MAINTAIN: &str = "Maintain Excellent Performance";

/// Every repository contract plus the snapshot and clock the views are
/// evaluated against.
pub trait SchoolRepository:
    StudentRepository
    + AttendanceRepository
    + CourseworkRepository
    + VideoRepository
    + TimetableRepository
{
    /// One consistent copy of every collection.
    fn snapshot(&self) -> Snapshot;

    fn current_time(&self) -> DateTime<Utc>;

    fn current_date(&self) -> NaiveDate {
        self.current_time().date_naive()
    }
}

impl<S: SnapshotStorage, C: Clock> SchoolRepository for SchoolStore<S, C> {
    fn snapshot(&self) -> Snapshot {
        self.load()
    }

    fn current_time(&self) -> DateTime<Utc> {
        self.clock().now()
    }
}

/// Student identity without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class: ClassNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
}

impl From<&Student> for StudentProfile {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            class: student.class,
            parent_email: student.parent_email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStatus {
    pub assignment: Assignment,
    pub stats: SubmissionStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentTotals {
    pub total_assignments: usize,
    pub overdue_assignments: usize,
    pub total_submissions: usize,
    pub overall_submission_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOverview {
    #[serde(rename = "class")]
    pub class: ClassNumber,
    pub total_students: usize,
    pub assignments: usize,
    pub videos: usize,
    pub present_today: usize,
    pub marked_today: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub present_count: usize,
    /// Roster size; unmarked students count as not present.
    pub total_count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    pub year: i32,
    pub month: u32,
    /// Distinct days with at least one mark for the class.
    pub total_days: usize,
    pub average_attendance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeeklyTrend {
    Up,
    Down,
    Stable,
}

/// Raw aggregates consumed by the parent report generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub student: StudentProfile,
    /// Unrounded rate over the report window.
    pub attendance_percentage: f64,
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub assignments_total: usize,
    pub assignments_submitted: usize,
    pub assignments_pending: usize,
    pub weekly_trend: WeeklyTrend,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAssignment {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttendance {
    /// One decimal place, `"0"` when there are no records.
    pub percentage: String,
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTimetableSlot {
    pub day: Weekday,
    pub subject: String,
    pub time_slot: String,
    pub teacher: String,
}

/// Read-only projection handed to the chat assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub student: StudentProfile,
    pub assignments: Vec<ChatAssignment>,
    pub attendance: ChatAttendance,
    pub timetable: Vec<ChatTimetableSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignment {
    pub assignment: Assignment,
    pub submission: Option<Submission>,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student: StudentProfile,
    pub attendance: AttendanceSummary,
    /// Newest first.
    pub recent_attendance: Vec<AttendanceRecord>,
    pub assignments: Vec<StudentAssignment>,
    pub videos: Vec<VideoLecture>,
    pub timetable: Vec<TimetableEntry>,
    pub today_schedule: Vec<TimetableEntry>,
}

/// Query/aggregation facade over a `SchoolRepository`.
pub struct SchoolService<'r, R: SchoolRepository> {
    repo: &'r R,
}

impl<'r, R: SchoolRepository> SchoolService<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    pub fn attendance_summary(&self, student_id: &str) -> AttendanceSummary {
        let snapshot = self.repo.snapshot();
        AttendanceSummary::from_records(student_attendance(&snapshot, student_id))
    }

    /// Per-assignment submission progress for one class.
    pub fn assignment_overview(&self, class: ClassNumber) -> Vec<AssignmentStatus> {
        let snapshot = self.repo.snapshot();
        let now = self.repo.current_time();
        let roster = snapshot.class_roster_ids(class);
        class_assignments(&snapshot, class)
            .map(|assignment| {
                let submitted = snapshot
                    .submissions
                    .iter()
                    .filter(|submission| submission.assignment_id == assignment.assignment_id)
                    .filter(|submission| roster.contains(submission.student_id.as_str()))
                    .count();
                let overdue = assignment.is_overdue_at(now);
                let stats = SubmissionStats::compute(submitted, roster.len(), overdue);
                AssignmentStatus {
                    assignment: assignment.clone(),
                    stats,
                }
            })
            .collect()
    }

    /// Class-level roll-up of `assignment_overview`.
    pub fn assignment_totals(&self, class: ClassNumber) -> AssignmentTotals {
        let overview = self.assignment_overview(class);
        let total_submissions = overview.iter().map(|status| status.stats.submitted).sum();
        let total_possible = overview
            .iter()
            .map(|status| status.stats.total_students)
            .sum();
        AssignmentTotals {
            total_assignments: overview.len(),
            overdue_assignments: overview.iter().filter(|status| status.stats.overdue).count(),
            total_submissions,
            overall_submission_rate: rounded_percent(total_submissions, total_possible),
        }
    }

    /// Admin dashboard tiles for every class, using today's marks.
    pub fn class_overview(&self) -> Vec<ClassOverview> {
        let snapshot = self.repo.snapshot();
        let today = self.repo.current_date();
        all_classes()
            .map(|class| {
                let roster = snapshot.class_roster_ids(class);
                let class_marks: Vec<&AttendanceRecord> = snapshot
                    .attendance
                    .iter()
                    .filter(|record| record.date == today)
                    .filter(|record| roster.contains(record.student_id.as_str()))
                    .collect();
                ClassOverview {
                    class,
                    total_students: roster.len(),
                    assignments: class_assignments(&snapshot, class).count(),
                    videos: snapshot
                        .videos
                        .iter()
                        .filter(|video| video.class == class)
                        .count(),
                    present_today: class_marks
                        .iter()
                        .filter(|record| record.status.is_present())
                        .count(),
                    marked_today: class_marks.len(),
                }
            })
            .collect()
    }

    pub fn daily_class_attendance(&self, class: ClassNumber, date: NaiveDate) -> DailyAttendance {
        let snapshot = self.repo.snapshot();
        let roster = snapshot.class_roster_ids(class);
        let present_count = snapshot
            .attendance
            .iter()
            .filter(|record| record.date == date && record.status.is_present())
            .filter(|record| roster.contains(record.student_id.as_str()))
            .count();
        DailyAttendance {
            date,
            present_count,
            total_count: roster.len(),
            percentage: rounded_percent(present_count, roster.len()),
        }
    }

    pub fn monthly_class_attendance(
        &self,
        class: ClassNumber,
        year: i32,
        month: u32,
    ) -> MonthlyAttendance {
        let snapshot = self.repo.snapshot();
        let roster = snapshot.class_roster_ids(class);
        let month_records: Vec<&AttendanceRecord> = snapshot
            .attendance
            .iter()
            .filter(|record| record.date.year() == year && record.date.month() == month)
            .filter(|record| roster.contains(record.student_id.as_str()))
            .collect();
        let total_days = month_records
            .iter()
            .map(|record| record.date)
            .collect::<BTreeSet<_>>()
            .len();
        let present = month_records
            .iter()
            .filter(|record| record.status.is_present())
            .count();
        MonthlyAttendance {
            year,
            month,
            total_days,
            average_attendance: rounded_percent(present, total_days * roster.len()),
        }
    }

    /// Parent report aggregates; `None` for an unknown student.
    pub fn student_report(&self, student_id: &str) -> Option<StudentReport> {
        let snapshot = self.repo.snapshot();
        let student = snapshot.student(student_id)?;
        let window_start = self.repo.current_date() - Duration::days(REPORT_WINDOW_DAYS);
        let recent: Vec<&AttendanceRecord> = student_attendance(&snapshot, student_id)
            .filter(|record| record.date >= window_start)
            .collect();
        let summary = AttendanceSummary::from_records(recent.iter().copied());
        let attendance_percentage = summary.exact_percentage();

        let last_week = &recent[recent.len().saturating_sub(TREND_SAMPLE_SIZE)..];
        let last_week_percentage =
            AttendanceSummary::from_records(last_week.iter().copied()).exact_percentage();
        let weekly_trend = if last_week_percentage > attendance_percentage + TREND_THRESHOLD_POINTS
        {
            WeeklyTrend::Up
        } else if last_week_percentage < attendance_percentage - TREND_THRESHOLD_POINTS {
            WeeklyTrend::Down
        } else {
            WeeklyTrend::Stable
        };

        let class_assignment_ids: Vec<&str> = class_assignments(&snapshot, student.class)
            .map(|assignment| assignment.assignment_id.as_str())
            .collect();
        let submitted_ids: HashSet<&str> = student_submissions(&snapshot, student_id)
            .map(|submission| submission.assignment_id.as_str())
            .collect();
        let assignments_submitted = class_assignment_ids
            .iter()
            .filter(|assignment_id| submitted_ids.contains(*assignment_id))
            .count();
        let assignments_total = class_assignment_ids.len();
        let assignments_pending = assignments_total.saturating_sub(assignments_submitted);

        let mut focus_areas = Vec::new();
        if attendance_percentage < LOW_ATTENDANCE_PERCENT {
            focus_areas.push(FOCUS_IMPROVE_ATTENDANCE.to_string());
        }
        if assignments_pending as f64 > assignments_total as f64 * PENDING_ASSIGNMENT_RATIO {
            focus_areas.push(FOCUS_PENDING_ASSIGNMENTS.to_string());
        }
        if focus_areas.is_empty() {
            focus_areas.push(FOCUS_MAINTAIN.to_string());
        }

        Some(StudentReport {
            student: StudentProfile::from(student),
            attendance_percentage,
            total_days: summary.total_days,
            present_days: summary.present_days,
            absent_days: summary.absent_days,
            assignments_total,
            assignments_submitted,
            assignments_pending,
            weekly_trend,
            focus_areas,
        })
    }

    /// Chat assistant projection; `None` for an unknown student.
    pub fn chat_context(&self, student_id: &str) -> Option<ChatContext> {
        let snapshot = self.repo.snapshot();
        let student = snapshot.student(student_id)?;
        let summary = AttendanceSummary::from_records(student_attendance(&snapshot, student_id));
        let percentage = if summary.total_days > 0 {
            format!("{:.1}", summary.exact_percentage())
        } else {
            "0".to_string()
        };

        Some(ChatContext {
            student: StudentProfile::from(student),
            assignments: class_assignments(&snapshot, student.class)
                .map(|assignment| ChatAssignment {
                    title: assignment.title.clone(),
                    description: assignment.description.clone(),
                    deadline: assignment.deadline,
                })
                .collect(),
            attendance: ChatAttendance {
                percentage,
                total_days: summary.total_days,
                present_days: summary.present_days,
                absent_days: summary.absent_days,
            },
            timetable: class_timetable(&snapshot, student.class)
                .map(|entry| ChatTimetableSlot {
                    day: entry.day,
                    subject: entry.subject.clone(),
                    time_slot: entry.time_slot.clone(),
                    teacher: entry.teacher.clone(),
                })
                .collect(),
        })
    }

    /// Everything the student landing page shows; `None` for an unknown student.
    pub fn student_dashboard(&self, student_id: &str) -> Option<StudentDashboard> {
        let snapshot = self.repo.snapshot();
        let student = snapshot.student(student_id)?;
        let now = self.repo.current_time();

        let mut recent_attendance: Vec<AttendanceRecord> =
            student_attendance(&snapshot, student_id).cloned().collect();
        let attendance = AttendanceSummary::from_records(&recent_attendance);
        recent_attendance.sort_by(|left, right| right.date.cmp(&left.date));

        let submissions: Vec<&Submission> = student_submissions(&snapshot, student_id).collect();
        let assignments = class_assignments(&snapshot, student.class)
            .map(|assignment| {
                let submission = submissions
                    .iter()
                    .find(|submission| submission.assignment_id == assignment.assignment_id)
                    .map(|submission| (*submission).clone());
                StudentAssignment {
                    overdue: submission.is_none() && assignment.is_overdue_at(now),
                    submission,
                    assignment: assignment.clone(),
                }
            })
            .collect();

        let timetable: Vec<TimetableEntry> = class_timetable(&snapshot, student.class)
            .cloned()
            .collect();
        let today = Weekday::from(now.date_naive().weekday());
        let today_schedule = TimetableGrid::from_entries(timetable.iter().cloned())
            .day_schedule(today)
            .into_iter()
            .cloned()
            .collect();

        Some(StudentDashboard {
            student: StudentProfile::from(student),
            attendance,
            recent_attendance,
            assignments,
            videos: snapshot
                .videos
                .iter()
                .filter(|video| video.class == student.class)
                .cloned()
                .collect(),
            timetable,
            today_schedule,
        })
    }

    /// Parent-report recipients in one class.
    pub fn students_with_parent_email(&self, class: ClassNumber) -> Vec<Student> {
        self.repo
            .snapshot()
            .students_in_class(class)
            .filter(|student| student.has_parent_email())
            .cloned()
            .collect()
    }
}

fn student_attendance<'a>(
    snapshot: &'a Snapshot,
    student_id: &'a str,
) -> impl Iterator<Item = &'a AttendanceRecord> + 'a {
    snapshot
        .attendance
        .iter()
        .filter(move |record| record.student_id == student_id)
}

fn student_submissions<'a>(
    snapshot: &'a Snapshot,
    student_id: &'a str,
) -> impl Iterator<Item = &'a Submission> + 'a {
    snapshot
        .submissions
        .iter()
        .filter(move |submission| submission.student_id == student_id)
}

fn class_assignments(snapshot: &Snapshot, class: ClassNumber) -> impl Iterator<Item = &Assignment> {
    snapshot
        .assignments
        .iter()
        .filter(move |assignment| assignment.class == class)
}

fn class_timetable(
    snapshot: &Snapshot,
    class: ClassNumber,
) -> impl Iterator<Item = &TimetableEntry> {
    snapshot
        .timetable
        .iter()
        .filter(move |entry| entry.class == class)
}
