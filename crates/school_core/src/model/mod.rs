//! Domain model for the school snapshot.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and FFI.
//! - Keep the persisted JSON shape (camelCase field names) in one place.
//!
//! # Invariants
//! - Every record is identified by its natural key; there are no surrogate ids.
//! - Cross-record references are key equality, never pointers.
//! - `class` is always within `MIN_CLASS..=MAX_CLASS` for accepted writes.

pub mod attendance;
pub mod coursework;
pub mod identity;
pub mod snapshot;
pub mod timetable;
pub mod validation;
pub mod video;

/// School class (grade) number used as the partition key for most records.
pub type ClassNumber = u8;

/// Lowest valid class number.
pub const MIN_CLASS: ClassNumber = 1;
/// Highest valid class number.
pub const MAX_CLASS: ClassNumber = 7;

/// Returns whether `class` is inside the supported class range.
pub fn is_valid_class(class: ClassNumber) -> bool {
    (MIN_CLASS..=MAX_CLASS).contains(&class)
}

/// Iterates all supported class numbers in ascending order.
pub fn all_classes() -> impl Iterator<Item = ClassNumber> {
    MIN_CLASS..=MAX_CLASS
}
