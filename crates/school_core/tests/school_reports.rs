use chrono::{Duration, NaiveDate, TimeZone, Utc};
use school_core::service::school_service::{
    WeeklyTrend, FOCUS_IMPROVE_ATTENDANCE, FOCUS_MAINTAIN, FOCUS_PENDING_ASSIGNMENTS,
};
use school_core::{
    Assignment, AttendanceRepository, AttendanceStatus, CourseworkRepository, ManualClock,
    MemorySnapshotStorage, SchoolService, SchoolStore, StudentRepository, Submission,
};

type TestStore = SchoolStore<MemorySnapshotStorage, ManualClock>;

fn store() -> TestStore {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap());
    SchoolStore::new(MemorySnapshotStorage::new(), clock)
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn mark_run(store: &TestStore, student_id: &str, days: &[(u32, AttendanceStatus)]) {
    for (day, status) in days {
        store.mark_attendance(student_id, june(*day), *status).unwrap();
    }
}

/// Student 20250101: one old present mark, then 3 present and 7 absent days.
/// Class 1 gets two assignments; the student submits one.
fn seed_class_one(store: &TestStore) -> (String, String) {
    store
        .mark_attendance(
            "20250101",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            AttendanceStatus::Present,
        )
        .unwrap();
    let days: Vec<(u32, AttendanceStatus)> = (21..=30)
        .map(|day| {
            let status = if day <= 23 {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            (day, status)
        })
        .collect();
    mark_run(store, "20250101", &days);
    store
        .mark_attendance("20250102", june(30), AttendanceStatus::Present)
        .unwrap();

    let past = store.now() - Duration::days(2);
    let future = store.now() + Duration::days(5);
    let done = store
        .create_assignment(&Assignment::draft(1, "Reading log", "Week 1", past))
        .unwrap();
    let open = store
        .create_assignment(&Assignment::draft(1, "Map work", "Rivers", future))
        .unwrap();
    store
        .submit_assignment(&Submission::new(
            done.as_str(),
            "20250101",
            "uploads/log.pdf",
            store.now(),
        ))
        .unwrap();
    (done, open)
}

#[test]
fn report_uses_thirty_day_window_and_flags_focus_areas() {
    let store = store();
    seed_class_one(&store);

    let report = SchoolService::new(&store).student_report("20250101").unwrap();

    assert_eq!(report.total_days, 10);
    assert_eq!(report.present_days, 3);
    assert_eq!(report.absent_days, 7);
    assert!((report.attendance_percentage - 30.0).abs() < 1e-9);
    assert_eq!(report.weekly_trend, WeeklyTrend::Down);
    assert_eq!(report.assignments_total, 2);
    assert_eq!(report.assignments_submitted, 1);
    assert_eq!(report.assignments_pending, 1);
    assert_eq!(
        report.focus_areas,
        vec![FOCUS_IMPROVE_ATTENDANCE, FOCUS_PENDING_ASSIGNMENTS]
    );
}

#[test]
fn report_without_records_is_zero_and_stable() {
    let store = store();
    let report = SchoolService::new(&store).student_report("20250405").unwrap();

    assert_eq!(report.total_days, 0);
    assert_eq!(report.attendance_percentage, 0.0);
    assert_eq!(report.weekly_trend, WeeklyTrend::Stable);
    assert_eq!(report.focus_areas, vec![FOCUS_IMPROVE_ATTENDANCE]);
}

#[test]
fn report_trend_up_and_maintain_focus() {
    let store = store();
    let improving: Vec<(u32, AttendanceStatus)> = (10..=24)
        .map(|day| {
            let status = if day <= 17 {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::Present
            };
            (day, status)
        })
        .collect();
    mark_run(&store, "20250201", &improving);
    let steady: Vec<(u32, AttendanceStatus)> =
        (20..=24).map(|day| (day, AttendanceStatus::Present)).collect();
    mark_run(&store, "20250202", &steady);

    let service = SchoolService::new(&store);
    assert_eq!(
        service.student_report("20250201").unwrap().weekly_trend,
        WeeklyTrend::Up
    );
    let steady_report = service.student_report("20250202").unwrap();
    assert_eq!(steady_report.weekly_trend, WeeklyTrend::Stable);
    assert_eq!(steady_report.focus_areas, vec![FOCUS_MAINTAIN]);
}

#[test]
fn unknown_student_has_no_report_or_context() {
    let store = store();
    let service = SchoolService::new(&store);
    assert!(service.student_report("ghost").is_none());
    assert!(service.chat_context("ghost").is_none());
    assert!(service.student_dashboard("ghost").is_none());
}

#[test]
fn chat_context_hides_password_and_formats_percentage() {
    let store = store();
    seed_class_one(&store);

    let context = SchoolService::new(&store).chat_context("20250101").unwrap();
    assert_eq!(context.attendance.percentage, "36.4");
    assert_eq!(context.attendance.total_days, 11);
    assert_eq!(context.assignments.len(), 2);
    assert_eq!(context.timetable.len(), 25);

    let json = serde_json::to_value(&context).unwrap();
    assert!(json["student"].get("password").is_none());
    assert_eq!(json["student"]["studentId"], "20250101");
    assert_eq!(json["timetable"][0]["timeSlot"], "09:00-10:00");

    let empty = SchoolService::new(&store).chat_context("20250301").unwrap();
    assert_eq!(empty.attendance.percentage, "0");
}

#[test]
fn class_overview_counts_todays_marks() {
    let store = store();
    seed_class_one(&store);

    let overview = SchoolService::new(&store).class_overview();
    assert_eq!(overview.len(), 7);
    let class_one = overview[0];
    assert_eq!(class_one.class, 1);
    assert_eq!(class_one.total_students, 20);
    assert_eq!(class_one.assignments, 2);
    assert_eq!(class_one.videos, 0);
    assert_eq!(class_one.present_today, 1);
    assert_eq!(class_one.marked_today, 2);
    assert_eq!(overview[6].marked_today, 0);
}

#[test]
fn daily_and_monthly_class_attendance() {
    let store = store();
    seed_class_one(&store);
    let service = SchoolService::new(&store);

    let daily = service.daily_class_attendance(1, june(30));
    assert_eq!(daily.present_count, 1);
    assert_eq!(daily.total_count, 20);
    assert_eq!(daily.percentage, 5);

    let monthly = service.monthly_class_attendance(1, 2025, 6);
    assert_eq!(monthly.total_days, 10);
    assert_eq!(monthly.average_attendance, 2);

    let quiet = service.monthly_class_attendance(4, 2025, 6);
    assert_eq!(quiet.total_days, 0);
    assert_eq!(quiet.average_attendance, 0);
}

#[test]
fn dashboard_pairs_assignments_with_submissions() {
    let store = store();
    let (done, open) = seed_class_one(&store);
    let service = SchoolService::new(&store);

    let dashboard = service.student_dashboard("20250101").unwrap();
    assert_eq!(dashboard.attendance.total_days, 11);
    assert_eq!(dashboard.recent_attendance[0].date, june(30));
    assert_eq!(dashboard.today_schedule.len(), 5);
    assert_eq!(dashboard.timetable.len(), 25);

    let submitted = dashboard
        .assignments
        .iter()
        .find(|item| item.assignment.assignment_id == done)
        .unwrap();
    assert!(submitted.submission.is_some());
    assert!(!submitted.overdue);
    let pending = dashboard
        .assignments
        .iter()
        .find(|item| item.assignment.assignment_id == open)
        .unwrap();
    assert!(pending.submission.is_none());
    assert!(!pending.overdue);

    let classmate = service.student_dashboard("20250102").unwrap();
    let missed = classmate
        .assignments
        .iter()
        .find(|item| item.assignment.assignment_id == done)
        .unwrap();
    assert!(missed.overdue);
}

#[test]
fn parent_recipients_need_a_non_blank_email() {
    let store = store();
    store
        .update_parent_email("20250103", Some("parent@example.com"))
        .unwrap();
    store.update_parent_email("20250104", Some("   ")).unwrap();

    let recipients = SchoolService::new(&store).students_with_parent_email(1);
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].student_id, "20250103");
}

#[test]
fn each_view_reads_storage_once() {
    let store = store();
    seed_class_one(&store);
    let service = SchoolService::new(&store);
    let storage = store.snapshots().storage();
    let mut seen = storage.read_count();
    let mut reads_since_last = || {
        let total = storage.read_count();
        let delta = total - seen;
        seen = total;
        delta
    };

    assert!(service.student_report("20250101").is_some());
    assert_eq!(reads_since_last(), 1);
    assert!(service.chat_context("20250101").is_some());
    assert_eq!(reads_since_last(), 1);
    assert!(service.student_dashboard("20250101").is_some());
    assert_eq!(reads_since_last(), 1);
    assert_eq!(service.class_overview().len(), 7);
    assert_eq!(reads_since_last(), 1);
    assert_eq!(service.assignment_totals(1).total_assignments, 2);
    assert_eq!(reads_since_last(), 1);
    assert_eq!(service.monthly_class_attendance(1, 2025, 6).year, 2025);
    assert_eq!(reads_since_last(), 1);
    assert_eq!(service.daily_class_attendance(1, june(30)).present_count, 1);
    assert_eq!(reads_since_last(), 1);
}
