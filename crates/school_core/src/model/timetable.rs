//! Weekly timetable entries.
//!
//! # Invariants
//! - At most one entry per `(class, day, time_slot)` is expected; the store does
//!   not deduplicate on whole-class replacement.

use super::validation::{require_class, require_time_slot, ValidationError};
use super::ClassNumber;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Day of the school week, serialized by English name (`"Monday"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Days covered by the default timetable.
    pub const SCHOOL_DAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Parses a case-insensitive English day name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monday" => Some(Self::Monday),
            "tuesday" => Some(Self::Tuesday),
            "wednesday" => Some(Self::Wednesday),
            "thursday" => Some(Self::Thursday),
            "friday" => Some(Self::Friday),
            "saturday" => Some(Self::Saturday),
            "sunday" => Some(Self::Sunday),
            _ => None,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(rename = "class")]
    pub class: ClassNumber,
    pub day: Weekday,
    /// `HH:MM-HH:MM`.
    pub time_slot: String,
    pub subject: String,
    pub teacher: String,
}

impl TimetableEntry {
    pub fn new(
        class: ClassNumber,
        day: Weekday,
        time_slot: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        Self {
            class,
            day,
            time_slot: time_slot.into(),
            subject: subject.into(),
            teacher: teacher.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_class(self.class)?;
        require_time_slot(&self.time_slot)
    }

    /// Returns whether this entry occupies the `(day, time_slot)` cell.
    pub fn occupies(&self, day: Weekday, time_slot: &str) -> bool {
        self.day == day && self.time_slot == time_slot
    }
}
