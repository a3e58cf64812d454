//! `(day, time_slot)` matrix view over a class timetable.

use crate::model::timetable::{TimetableEntry, Weekday};
use std::collections::{BTreeMap, BTreeSet};

/// Grid index for UI rendering. A missing cell means "unscheduled".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableGrid {
    cells: BTreeMap<(Weekday, String), TimetableEntry>,
}

impl TimetableGrid {
    /// Indexes `entries`; when a cell appears twice the first entry wins.
    pub fn from_entries(entries: impl IntoIterator<Item = TimetableEntry>) -> Self {
        let mut cells = BTreeMap::new();
        for entry in entries {
            cells
                .entry((entry.day, entry.time_slot.clone()))
                .or_insert(entry);
        }
        Self { cells }
    }

    pub fn get(&self, day: Weekday, time_slot: &str) -> Option<&TimetableEntry> {
        self.cells.get(&(day, time_slot.to_string()))
    }

    pub fn is_scheduled(&self, day: Weekday, time_slot: &str) -> bool {
        self.get(day, time_slot).is_some()
    }

    /// Days with at least one entry, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        self.cells
            .keys()
            .map(|(day, _)| *day)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct time slots across all days, in lexical (= chronological) order.
    pub fn time_slots(&self) -> Vec<String> {
        self.cells
            .keys()
            .map(|(_, slot)| slot.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Entries of one day sorted by time slot.
    pub fn day_schedule(&self, day: Weekday) -> Vec<&TimetableEntry> {
        self.cells
            .iter()
            .filter(|((cell_day, _), _)| *cell_day == day)
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
