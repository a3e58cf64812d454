//! Identifier construction for students, assignments and videos.
//!
//! # Invariants
//! - Generated student ids are `<year:4><class:2><ordinal:2>`.
//! - Timestamp ids are `<prefix>_<epoch millis>` and never collide within a
//!   snapshot, even when two allocations share one clock millisecond.
//! - They strictly increase unless an existing id already holds `i64::MAX`.

use crate::model::ClassNumber;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

pub const ASSIGNMENT_ID_PREFIX: &str = "assign";
pub const VIDEO_ID_PREFIX: &str = "video";

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("valid student id regex"));

/// Formats a generated student id.
pub fn student_id(year: u16, class: ClassNumber, ordinal: u8) -> String {
    format!("{year:04}{class:02}{ordinal:02}")
}

/// Splits a generated student id into `(year, class, ordinal)`.
///
/// Returns `None` for ids that were entered free-form.
pub fn parse_student_id(value: &str) -> Option<(u16, ClassNumber, u8)> {
    let captures = STUDENT_ID_RE.captures(value)?;
    let year = captures[1].parse().ok()?;
    let class = captures[2].parse().ok()?;
    let ordinal = captures[3].parse().ok()?;
    Some((year, class, ordinal))
}

/// Suggests the next generated student id for `class` in `year`.
///
/// Picks one past the highest ordinal already used by `existing`; returns `None`
/// once the two-digit ordinal space is exhausted.
pub fn next_student_id<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    year: u16,
    class: ClassNumber,
) -> Option<String> {
    let highest = existing
        .into_iter()
        .filter_map(parse_student_id)
        .filter(|(id_year, id_class, _)| *id_year == year && *id_class == class)
        .map(|(_, _, ordinal)| ordinal)
        .max()
        .unwrap_or(0);
    let next = highest.checked_add(1).filter(|ordinal| *ordinal <= 99)?;
    Some(student_id(year, class, next))
}

/// Allocates `<prefix>_<millis>` that does not collide with `existing`.
///
/// The numeric part is `max(now_millis, largest existing + 1)`. When the largest
/// existing value sits at `i64::MAX` the first unused value at or after
/// `now_millis` is taken instead, then the first unused one below it.
pub fn allocate_timestamp_id<'a>(
    prefix: &str,
    now: DateTime<Utc>,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    let marker = format!("{prefix}_");
    let used: BTreeSet<i64> = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(marker.as_str()))
        .filter_map(|millis| millis.parse::<i64>().ok())
        .collect();
    let now_millis = now.timestamp_millis();
    let millis = match used.last() {
        Some(&largest) if largest >= now_millis => largest
            .checked_add(1)
            .unwrap_or_else(|| first_unused(&used, now_millis)),
        _ => now_millis,
    };
    format!("{marker}{millis}")
}

fn first_unused(used: &BTreeSet<i64>, from: i64) -> i64 {
    let upward = (from..=i64::MAX).find(|candidate| !used.contains(candidate));
    upward
        .or_else(|| (i64::MIN..from).rev().find(|candidate| !used.contains(candidate)))
        .unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::{allocate_timestamp_id, next_student_id, parse_student_id, student_id};
    use chrono::{TimeZone, Utc};

    #[test]
    fn student_id_pads_class_and_ordinal() {
        assert_eq!(student_id(2025, 1, 1), "20250101");
        assert_eq!(student_id(2025, 7, 20), "20250720");
    }

    #[test]
    fn parse_student_id_rejects_free_form_ids() {
        assert_eq!(parse_student_id("20250314"), Some((2025, 3, 14)));
        assert_eq!(parse_student_id("S-001"), None);
        assert_eq!(parse_student_id("2025031"), None);
    }

    #[test]
    fn next_student_id_skips_past_highest_ordinal() {
        let existing = ["20250301", "20250305", "20250401", "custom"];
        assert_eq!(
            next_student_id(existing, 2025, 3).as_deref(),
            Some("20250306")
        );
        assert_eq!(
            next_student_id(existing, 2025, 6).as_deref(),
            Some("20250601")
        );
        assert_eq!(next_student_id(["20250299"], 2025, 2), None);
    }

    #[test]
    fn timestamp_ids_stay_unique_within_one_millisecond() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let first = allocate_timestamp_id("assign", now, std::iter::empty());
        assert_eq!(first, "assign_1700000000000");

        let second = allocate_timestamp_id("assign", now, [first.as_str()]);
        assert_eq!(second, "assign_1700000000001");

        let video = allocate_timestamp_id("video", now, [first.as_str(), second.as_str()]);
        assert_eq!(video, "video_1700000000000");
    }

    #[test]
    fn timestamp_ids_do_not_overflow_at_the_top_of_the_range() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ceiling = format!("assign_{}", i64::MAX);
        let taken = "assign_1700000000000";

        let next = allocate_timestamp_id("assign", now, [ceiling.as_str(), taken]);
        assert_eq!(next, "assign_1700000000001");

        let alone = allocate_timestamp_id("assign", now, [ceiling.as_str()]);
        assert_eq!(alone, "assign_1700000000000");
    }
}
