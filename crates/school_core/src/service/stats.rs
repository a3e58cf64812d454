//! Pure aggregate math shared by dashboards, reports and the chat projection.
//!
//! # Invariants
//! - Percentages never divide by zero; an empty denominator yields `0`.
//! - Rounded percentages use half-away-from-zero rounding.

use crate::model::attendance::AttendanceRecord;
use serde::Serialize;

/// `part / total * 100`, unrounded; `0.0` when `total == 0`.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// `percent` rounded to a whole number.
pub fn rounded_percent(part: usize, total: usize) -> u32 {
    percent(part, total).round() as u32
}

/// Present/absent counts over a set of attendance records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    /// Rounded `present / total * 100`.
    pub percentage: u32,
}

impl AttendanceSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let (total_days, present_days) = records
            .into_iter()
            .fold((0, 0), |(total, present), record| {
                (total + 1, present + usize::from(record.status.is_present()))
            });
        Self {
            total_days,
            present_days,
            absent_days: total_days - present_days,
            percentage: rounded_percent(present_days, total_days),
        }
    }

    /// Unrounded attendance rate.
    pub fn exact_percentage(&self) -> f64 {
        percent(self.present_days, self.total_days)
    }
}

/// Submission progress of one assignment against its class roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub submitted: usize,
    pub total_students: usize,
    pub pending: usize,
    /// Rounded `submitted / total_students * 100`.
    pub submission_rate: u32,
    /// `now > deadline` at read time.
    pub overdue: bool,
}

impl SubmissionStats {
    pub fn compute(submitted: usize, total_students: usize, overdue: bool) -> Self {
        Self {
            submitted,
            total_students,
            pending: total_students.saturating_sub(submitted),
            submission_rate: rounded_percent(submitted, total_students),
            overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{rounded_percent, AttendanceSummary, SubmissionStats};
    use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
    use chrono::NaiveDate;

    #[test]
    fn zero_denominator_yields_zero() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(AttendanceSummary::from_records(std::iter::empty()).percentage, 0);
        assert_eq!(SubmissionStats::compute(0, 0, false).submission_rate, 0);
    }

    #[test]
    fn rounding_matches_half_up_for_positive_values() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
    }

    #[test]
    fn summary_counts_present_and_absent() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let records = vec![
            AttendanceRecord::new("s1", day(6), AttendanceStatus::Present),
            AttendanceRecord::new("s1", day(7), AttendanceStatus::Absent),
            AttendanceRecord::new("s1", day(8), AttendanceStatus::Present),
        ];
        let summary = AttendanceSummary::from_records(&records);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.percentage, 67);
    }

    #[test]
    fn pending_never_underflows() {
        let stats = SubmissionStats::compute(5, 3, true);
        assert_eq!(stats.pending, 0);
        assert!(stats.overdue);
    }
}
