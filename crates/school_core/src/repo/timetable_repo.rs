//! Timetable repository contract and snapshot implementation.
//!
//! # Invariants
//! - `replace_class_timetable` discards the whole class partition and writes
//!   the given entries in one snapshot write; other classes are untouched.
//! - Replacement does not deduplicate `(day, time_slot)`; callers pass a clean set.
//! - Entries are re-stamped with the target class before they are stored.

use super::{EntityKind, RepoError, RepoResult};
use crate::bootstrap::rotating_class_timetable;
use crate::clock::Clock;
use crate::model::timetable::{TimetableEntry, Weekday};
use crate::model::validation::require_class;
use crate::model::ClassNumber;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;

pub trait TimetableRepository {
    fn timetable_for_class(&self, class: ClassNumber) -> Vec<TimetableEntry>;

    /// Replaces every entry of `class` with `entries`.
    fn replace_class_timetable(
        &self,
        class: ClassNumber,
        entries: &[TimetableEntry],
    ) -> RepoResult<()>;

    /// One class's schedule for `day`, in stored order.
    fn timetable_for_class_on(&self, class: ClassNumber, day: Weekday) -> Vec<TimetableEntry> {
        self.timetable_for_class(class)
            .into_iter()
            .filter(|entry| entry.day == day)
            .collect()
    }

    /// Sets one `(day, time_slot)` cell, replacing whatever occupied it.
    fn set_timetable_entry(&self, class: ClassNumber, entry: &TimetableEntry) -> RepoResult<()> {
        let mut entries = self.timetable_for_class(class);
        entries.retain(|existing| !existing.occupies(entry.day, &entry.time_slot));
        entries.push(entry.clone());
        self.replace_class_timetable(class, &entries)
    }

    /// Overwrites `class` with the rotating default week.
    fn regenerate_class_timetable(&self, class: ClassNumber) -> RepoResult<()> {
        self.replace_class_timetable(class, &rotating_class_timetable(class))
    }

    /// Clears one `(day, time_slot)` cell; `NotFound` when it was unscheduled.
    fn remove_timetable_entry(
        &self,
        class: ClassNumber,
        day: Weekday,
        time_slot: &str,
    ) -> RepoResult<()> {
        let mut entries = self.timetable_for_class(class);
        let before = entries.len();
        entries.retain(|existing| !existing.occupies(day, time_slot));
        if entries.len() == before {
            return Err(RepoError::not_found(
                EntityKind::TimetableEntry,
                format!("class {class} {day} {time_slot}"),
            ));
        }
        self.replace_class_timetable(class, &entries)
    }
}

impl<S: SnapshotStorage, C: Clock> TimetableRepository for SchoolStore<S, C> {
    fn timetable_for_class(&self, class: ClassNumber) -> Vec<TimetableEntry> {
        self.read(|snapshot| {
            snapshot
                .timetable
                .iter()
                .filter(|entry| entry.class == class)
                .cloned()
                .collect()
        })
    }

    fn replace_class_timetable(
        &self,
        class: ClassNumber,
        entries: &[TimetableEntry],
    ) -> RepoResult<()> {
        require_class(class)?;
        let replacement = entries
            .iter()
            .map(|entry| {
                let mut stamped = entry.clone();
                stamped.class = class;
                stamped.validate().map(|()| stamped)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.write("timetable_replace_class", |snapshot, _| {
            snapshot.timetable.retain(|entry| entry.class != class);
            snapshot.timetable.extend(replacement);
            Ok(())
        })
    }
}
