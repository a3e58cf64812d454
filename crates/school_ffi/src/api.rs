//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level school operations to Dart via FRB.
//! - Convert typed core results into envelopes the UI can branch on.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every store call receives the database path from the host; nothing is
//!   cached between calls.
//! - Secrets are never echoed back in messages.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use log::warn;
use school_core::db::open_db;
use school_core::model::coursework::submission_file_url;
use school_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Assignment, AttendanceRepository, AttendanceStatus, CourseworkRepository, IdentityLookup,
    SchoolService, SchoolStore, SqliteSnapshotStorage, Student, StudentRepository, Submission,
    SystemClock, TimetableEntry, TimetableRepository, VideoLecture, VideoRepository, Weekday,
};
use serde::Serialize;

type SqliteSchoolStore<'conn> = SchoolStore<SqliteSnapshotStorage<'conn>, SystemClock>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for commands and logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the affected or created record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: Some(id.into()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Result envelope for read views serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub ok: bool,
    /// camelCase JSON document; empty when `ok` is false.
    pub json: String,
    pub message: String,
}

/// Signs an admin in by exact id/password match.
#[flutter_rust_bridge::frb(sync)]
pub fn login_admin(db_path: String, admin_id: String, password: String) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        Ok(store.authenticate_admin(admin_id.trim(), &password))
    });
    match outcome {
        Ok(Some(admin)) => {
            ActionResponse::success(format!("Welcome, {}.", admin.name), admin.admin_id)
        }
        Ok(None) => ActionResponse::failure("Invalid admin credentials."),
        Err(err) => failed("login_admin", err),
    }
}

/// Signs a student in by exact id/password match.
#[flutter_rust_bridge::frb(sync)]
pub fn login_student(db_path: String, student_id: String, password: String) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        Ok(store.authenticate_student(student_id.trim(), &password))
    });
    match outcome {
        Ok(Some(student)) => ActionResponse::success(
            format!("Welcome, {}.", student.name),
            student.student_id,
        ),
        Ok(None) => ActionResponse::failure("Invalid student credentials."),
        Err(err) => failed("login_student", err),
    }
}

/// Adds a student. A blank `student_id` takes the next generated id for
/// `class` under the current year.
#[flutter_rust_bridge::frb(sync)]
pub fn student_add(
    db_path: String,
    student_id: Option<String>,
    name: String,
    class: u8,
    password: String,
) -> ActionResponse {
    let requested_id = student_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let outcome = with_store(&db_path, |store| {
        let student_id = match requested_id {
            Some(id) => id,
            None => {
                let year = u16::try_from(store.now().year())
                    .map_err(|_| "current year does not fit an id prefix".to_string())?;
                store
                    .suggest_student_id(year, class)
                    .ok_or_else(|| format!("class {class} has no free student ids"))?
            }
        };
        let student = Student::new(student_id.as_str(), name.trim(), class, password.as_str());
        store.add_student(&student).map_err(|err| err.to_string())?;
        Ok(student_id)
    });
    match outcome {
        Ok(id) => ActionResponse::success("Student added.", id),
        Err(err) => failed("student_add", err),
    }
}

/// Deletes a student with its attendance and submissions.
#[flutter_rust_bridge::frb(sync)]
pub fn student_delete(db_path: String, student_id: String) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        store
            .delete_student(student_id.trim())
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(summary) => ActionResponse::success(
            format!(
                "Student deleted ({} attendance, {} submission rows removed).",
                summary.attendance_removed, summary.submissions_removed
            ),
            student_id.trim(),
        ),
        Err(err) => failed("student_delete", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_update_class(db_path: String, student_id: String, new_class: u8) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        store
            .update_student_class(student_id.trim(), new_class)
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(()) => {
            ActionResponse::success(format!("Moved to class {new_class}."), student_id.trim())
        }
        Err(err) => failed("student_update_class", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_reset_password(
    db_path: String,
    student_id: String,
    new_password: String,
) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        store
            .update_student_password(student_id.trim(), &new_password)
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Password updated.", student_id.trim()),
        Err(err) => failed("student_reset_password", err),
    }
}

/// Sets or clears (`None`/blank) the parent email used for reports.
#[flutter_rust_bridge::frb(sync)]
pub fn student_set_parent_email(
    db_path: String,
    student_id: String,
    email: Option<String>,
) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        store
            .update_parent_email(student_id.trim(), email.as_deref())
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Parent email updated.", student_id.trim()),
        Err(err) => failed("student_set_parent_email", err),
    }
}

/// Marks one student for one day.
///
/// Input semantics:
/// - `date`: `YYYY-MM-DD`.
/// - `status`: `present|absent` (case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_mark(
    db_path: String,
    student_id: String,
    date: String,
    status: String,
) -> ActionResponse {
    let outcome = parse_date(&date).and_then(|date| {
        let status = parse_status(&status)?;
        with_store(&db_path, |store| {
            store
                .mark_attendance(student_id.trim(), date, status)
                .map_err(|err| err.to_string())
        })
    });
    match outcome {
        Ok(()) => ActionResponse::success("Attendance saved.", student_id.trim()),
        Err(err) => failed("attendance_mark", err),
    }
}

/// Creates an assignment due at `deadline_epoch_ms`; returns the new id.
#[flutter_rust_bridge::frb(sync)]
pub fn assignment_create(
    db_path: String,
    class: u8,
    title: String,
    description: String,
    deadline_epoch_ms: i64,
) -> ActionResponse {
    let outcome = Utc
        .timestamp_millis_opt(deadline_epoch_ms)
        .single()
        .ok_or_else(|| format!("deadline {deadline_epoch_ms} is out of range"))
        .and_then(|deadline| {
            let draft = Assignment::draft(class, title.trim(), description.trim(), deadline);
            with_store(&db_path, |store| {
                store.create_assignment(&draft).map_err(|err| err.to_string())
            })
        });
    match outcome {
        Ok(id) => ActionResponse::success("Assignment created.", id),
        Err(err) => failed("assignment_create", err),
    }
}

/// Records (or replaces) a student's submission; `id` is the stored file url.
#[flutter_rust_bridge::frb(sync)]
pub fn assignment_submit(
    db_path: String,
    assignment_id: String,
    student_id: String,
    file_name: String,
) -> ActionResponse {
    let assignment_id = assignment_id.trim();
    let student_id = student_id.trim();
    let file_url = submission_file_url(student_id, assignment_id, file_name.trim());
    let outcome = with_store(&db_path, |store| {
        let submission = Submission::new(assignment_id, student_id, file_url.as_str(), store.now());
        store
            .submit_assignment(&submission)
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(stored) => ActionResponse::success("Submission saved.", stored.file_url),
        Err(err) => failed("assignment_submit", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn video_create(
    db_path: String,
    class: u8,
    title: String,
    description: String,
    video_url: String,
) -> ActionResponse {
    let draft = VideoLecture::draft(class, title.trim(), description.trim(), video_url.trim());
    match with_store(&db_path, |store| {
        store.create_video(&draft).map_err(|err| err.to_string())
    }) {
        Ok(id) => ActionResponse::success("Video added.", id),
        Err(err) => failed("video_create", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn video_delete(db_path: String, video_id: String) -> ActionResponse {
    match with_store(&db_path, |store| {
        store
            .delete_video(video_id.trim())
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Video deleted.", video_id.trim()),
        Err(err) => failed("video_delete", err),
    }
}

/// Sets one `(day, time_slot)` cell of a class timetable.
///
/// Input semantics:
/// - `day`: weekday name, case-insensitive.
/// - `time_slot`: `HH:MM-HH:MM`.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_set_entry(
    db_path: String,
    class: u8,
    day: String,
    time_slot: String,
    subject: String,
    teacher: String,
) -> ActionResponse {
    let outcome = parse_day(&day).and_then(|day| {
        let entry =
            TimetableEntry::new(class, day, time_slot.trim(), subject.trim(), teacher.trim());
        with_store(&db_path, |store| {
            store
                .set_timetable_entry(class, &entry)
                .map_err(|err| err.to_string())
        })
    });
    match outcome {
        Ok(()) => ActionResponse::success("Timetable updated.", time_slot.trim()),
        Err(err) => failed("timetable_set_entry", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn timetable_remove_entry(
    db_path: String,
    class: u8,
    day: String,
    time_slot: String,
) -> ActionResponse {
    let outcome = parse_day(&day).and_then(|day| {
        with_store(&db_path, |store| {
            store
                .remove_timetable_entry(class, day, time_slot.trim())
                .map_err(|err| err.to_string())
        })
    });
    match outcome {
        Ok(()) => ActionResponse::success("Timetable entry removed.", time_slot.trim()),
        Err(err) => failed("timetable_remove_entry", err),
    }
}

/// Resets one class to the generated week, rotating subjects across days.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_generate_default(db_path: String, class: u8) -> ActionResponse {
    let outcome = with_store(&db_path, |store| {
        store
            .regenerate_class_timetable(class)
            .map_err(|err| err.to_string())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Default timetable generated.", class.to_string()),
        Err(err) => failed("timetable_generate_default", err),
    }
}

/// Parent report aggregates for one student.
#[flutter_rust_bridge::frb(sync)]
pub fn student_report_json(db_path: String, student_id: String) -> JsonResponse {
    to_json_response(
        "student_report_json",
        with_store(&db_path, |store| {
            SchoolService::new(store)
                .student_report(student_id.trim())
                .ok_or_else(|| format!("student not found: {}", student_id.trim()))
        }),
    )
}

/// Read-only projection for the chat assistant.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_context_json(db_path: String, student_id: String) -> JsonResponse {
    to_json_response(
        "chat_context_json",
        with_store(&db_path, |store| {
            SchoolService::new(store)
                .chat_context(student_id.trim())
                .ok_or_else(|| format!("student not found: {}", student_id.trim()))
        }),
    )
}

/// Admin dashboard tiles for every class.
#[flutter_rust_bridge::frb(sync)]
pub fn class_overview_json(db_path: String) -> JsonResponse {
    to_json_response(
        "class_overview_json",
        with_store(&db_path, |store| Ok(SchoolService::new(store).class_overview())),
    )
}

fn with_store<T>(
    db_path: &str,
    f: impl FnOnce(&SqliteSchoolStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = db_path.trim();
    if db_path.is_empty() {
        return Err("db_path cannot be empty".to_string());
    }
    let conn = open_db(db_path).map_err(|err| format!("school DB open failed: {err}"))?;
    let store = SchoolStore::sqlite(&conn);
    f(&store)
}

fn failed(op: &'static str, err: String) -> ActionResponse {
    warn!("event=ffi_call module=ffi status=error op={op}");
    ActionResponse::failure(format!("{op} failed: {err}"))
}

fn to_json_response<T: Serialize>(op: &'static str, outcome: Result<T, String>) -> JsonResponse {
    match outcome.and_then(|view| serde_json::to_string(&view).map_err(|err| err.to_string())) {
        Ok(json) => JsonResponse {
            ok: true,
            json,
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op}");
            JsonResponse {
                ok: false,
                json: String::new(),
                message: format!("{op} failed: {err}"),
            }
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{}`: {err}", raw.trim()))
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "present" => Ok(AttendanceStatus::Present),
        "absent" => Ok(AttendanceStatus::Absent),
        other => Err(format!("unsupported status `{other}`; expected present|absent")),
    }
}

fn parse_day(raw: &str) -> Result<Weekday, String> {
    Weekday::parse(raw).ok_or_else(|| format!("unknown day `{}`", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::{
        assignment_create, assignment_submit, attendance_mark, chat_context_json,
        class_overview_json, core_version, init_logging, login_admin, login_student, ping,
        student_add, student_delete, student_report_json, student_reset_password,
        student_set_parent_email, student_update_class, timetable_generate_default,
        timetable_remove_entry, timetable_set_entry, video_create, video_delete,
    };
    use school_core::db::open_db;
    use chrono::Datelike;
    use school_core::{Clock, SchoolStore, SystemClock, TimetableRepository, Weekday};
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, String) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir
            .path()
            .join("school.sqlite3")
            .to_str()
            .expect("utf-8 path")
            .to_string();
        (dir, path)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn blank_db_path_fails_without_panicking() {
        let response = login_admin(
            "  ".to_string(),
            "admin001".to_string(),
            "admin123".to_string(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("db_path"));
    }

    #[test]
    fn default_accounts_can_log_in() {
        let (_dir, db) = temp_db();
        let admin = login_admin(db.clone(), "admin001".to_string(), "admin123".to_string());
        assert!(admin.ok, "{}", admin.message);
        assert_eq!(admin.id.as_deref(), Some("admin001"));

        let student = login_student(db.clone(), "20250101".to_string(), "student123".to_string());
        assert!(student.ok, "{}", student.message);

        let rejected = login_student(db, "20250101".to_string(), "nope".to_string());
        assert!(!rejected.ok);
        assert!(!rejected.message.contains("nope"));
    }

    #[test]
    fn student_lifecycle_round_trips_through_the_db_file() {
        let (_dir, db) = temp_db();

        let added = student_add(db.clone(), None, "New Pupil".to_string(), 2, "pw".to_string());
        assert!(added.ok, "{}", added.message);
        let id = added.id.expect("generated id");
        assert_eq!(id.len(), 8);
        assert_eq!(&id[4..6], "02");
        assert_eq!(id[..4], SystemClock.now().year().to_string());

        let duplicate = student_add(
            db.clone(),
            Some(id.clone()),
            "Again".to_string(),
            2,
            "pw".to_string(),
        );
        assert!(!duplicate.ok);

        assert!(student_update_class(db.clone(), id.clone(), 3).ok);
        assert!(!student_update_class(db.clone(), id.clone(), 9).ok);
        assert!(student_reset_password(db.clone(), id.clone(), "pw2".to_string()).ok);
        assert!(login_student(db.clone(), id.clone(), "pw2".to_string()).ok);
        assert!(
            student_set_parent_email(db.clone(), id.clone(), Some("p@example.com".to_string()))
                .ok
        );

        let deleted = student_delete(db.clone(), id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!login_student(db, id, "pw2".to_string()).ok);
    }

    #[test]
    fn attendance_inputs_are_parsed_before_touching_the_store() {
        let (_dir, db) = temp_db();
        assert!(
            attendance_mark(
                db.clone(),
                "20250101".to_string(),
                "2025-03-04".to_string(),
                "Present".to_string()
            )
            .ok
        );
        let bad_date = attendance_mark(
            db.clone(),
            "20250101".to_string(),
            "04/03/2025".to_string(),
            "present".to_string(),
        );
        assert!(bad_date.message.contains("invalid date"));
        let bad_status = attendance_mark(
            db,
            "20250101".to_string(),
            "2025-03-04".to_string(),
            "late".to_string(),
        );
        assert!(bad_status.message.contains("unsupported status"));
    }

    #[test]
    fn coursework_and_reports_are_exposed_as_json() {
        let (_dir, db) = temp_db();
        let created = assignment_create(
            db.clone(),
            1,
            "Essay".to_string(),
            "Two pages".to_string(),
            4_102_444_800_000,
        );
        assert!(created.ok, "{}", created.message);
        let assignment_id = created.id.expect("assignment id");
        assert!(assignment_id.starts_with("assign_"));

        let submitted = assignment_submit(
            db.clone(),
            assignment_id.clone(),
            "20250101".to_string(),
            "essay.pdf".to_string(),
        );
        assert_eq!(
            submitted.id,
            Some(format!("uploads/20250101_{assignment_id}_essay.pdf"))
        );

        let report = student_report_json(db.clone(), "20250101".to_string());
        assert!(report.ok, "{}", report.message);
        let report: serde_json::Value = serde_json::from_str(&report.json).expect("report json");
        assert_eq!(report["assignmentsSubmitted"], 1);

        let chat = chat_context_json(db.clone(), "20250101".to_string());
        assert!(chat.ok);
        assert!(!chat.json.contains("password"));
        assert!(!chat_context_json(db.clone(), "ghost".to_string()).ok);

        let overview = class_overview_json(db);
        let overview: serde_json::Value =
            serde_json::from_str(&overview.json).expect("overview json");
        assert_eq!(overview[0]["assignments"], 1);
        assert_eq!(overview.as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn videos_and_timetable_cells_can_be_edited() {
        let (_dir, db) = temp_db();
        let video = video_create(
            db.clone(),
            4,
            "Volcanoes".to_string(),
            String::new(),
            "https://videos.example/v".to_string(),
        );
        assert!(video.ok, "{}", video.message);
        assert!(video_delete(db.clone(), video.id.expect("video id")).ok);

        assert!(
            timetable_set_entry(
                db.clone(),
                4,
                "saturday".to_string(),
                "09:00-10:00".to_string(),
                "Sports".to_string(),
                "Coach Rao".to_string()
            )
            .ok
        );
        assert!(
            timetable_remove_entry(db.clone(), 4, "Saturday".to_string(), "09:00-10:00".to_string())
                .ok
        );
        let unknown_day =
            timetable_remove_entry(db, 4, "Funday".to_string(), "09:00-10:00".to_string());
        assert!(unknown_day.message.contains("unknown day"));
    }

    #[test]
    fn generated_default_week_replaces_one_class() {
        let (_dir, db) = temp_db();
        assert!(
            timetable_set_entry(
                db.clone(),
                2,
                "Monday".to_string(),
                "09:00-10:00".to_string(),
                "Music".to_string(),
                "Ms. Rao".to_string()
            )
            .ok
        );

        let response = timetable_generate_default(db.clone(), 2);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.id.as_deref(), Some("2"));

        let conn = open_db(&db).expect("open db");
        let store = SchoolStore::sqlite(&conn);
        let monday = store.timetable_for_class_on(2, Weekday::Monday);
        assert_eq!(monday[0].subject, "Mathematics");
        let tuesday = store.timetable_for_class_on(2, Weekday::Tuesday);
        assert_eq!(tuesday[0].subject, "Art");
        assert_eq!(store.timetable_for_class(2).len(), 25);

        assert!(!timetable_generate_default(db, 0).ok);
    }
}
