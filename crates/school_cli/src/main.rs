//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `school_core` linkage.
//! - With a database path, initialize the store and print per-class counts.

use school_core::db::migrations::schema_version;
use school_core::db::open_db;
use school_core::{SchoolService, SchoolStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("school_core ping={}", school_core::ping());
    println!("school_core version={}", school_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match summarize(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("school_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(db_path: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| format!("cannot open `{db_path}`: {err}"))?;
    let schema = schema_version(&conn).map_err(|err| format!("cannot read schema: {err}"))?;
    println!("db schema_version={schema}");
    let store = SchoolStore::sqlite(&conn);
    if !store.initialize() {
        return Err("failed to write default snapshot".to_string());
    }

    let snapshot = store.load();
    println!(
        "store admins={} students={} assignments={} videos={} timetable_entries={}",
        snapshot.admins.len(),
        snapshot.students.len(),
        snapshot.assignments.len(),
        snapshot.videos.len(),
        snapshot.timetable.len()
    );
    for class in SchoolService::new(&store).class_overview() {
        println!(
            "class={} students={} assignments={} videos={} present_today={}/{}",
            class.class,
            class.total_students,
            class.assignments,
            class.videos,
            class.present_today,
            class.marked_today
        );
    }
    Ok(())
}
