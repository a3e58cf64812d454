//! Opening the school database.
//!
//! # Invariants
//! - Returned connections wait up to `BUSY_TIMEOUT` on a locked file.
//! - Returned connections are at `migrations::latest_version()`.

use super::migrations::{apply_migrations, MigrationOutcome};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens or creates the school database file at `path`.
///
/// # Side effects
/// - Creates the file and the `snapshots` table when missing.
/// - Logs `db_open` with the schema range and elapsed time.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Throwaway database with the current schema, for tests and previews.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = opener().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    let schema = match prepare_connection(&mut conn) {
        Ok(schema) => schema,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_schema_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }
    };

    info!(
        "event=db_open module=db status=ok mode={mode} schema_from={} schema_to={} duration_ms={}",
        schema.from_version,
        schema.to_version,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn prepare_connection(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
