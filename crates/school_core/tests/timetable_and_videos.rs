use chrono::{Duration, TimeZone, Utc};
use school_core::service::schedule::TimetableGrid;
use school_core::{
    EntityKind, ManualClock, MemorySnapshotStorage, RepoError, SchoolStore, TimetableEntry,
    TimetableRepository, ValidationError, VideoLecture, VideoRepository, Weekday,
};

fn store() -> SchoolStore<MemorySnapshotStorage, ManualClock> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 12, 7, 30, 0).unwrap());
    SchoolStore::new(MemorySnapshotStorage::new(), clock)
}

#[test]
fn replacing_one_class_leaves_others_untouched() {
    let store = store();
    let class_two_before = store.timetable_for_class(2);

    store
        .replace_class_timetable(
            1,
            &[
                TimetableEntry::new(1, Weekday::Monday, "08:00-09:00", "Art", "Mr. Verma"),
                TimetableEntry::new(1, Weekday::Friday, "12:00-13:00", "Music", "Ms. Rao"),
            ],
        )
        .unwrap();

    assert_eq!(store.timetable_for_class(1).len(), 2);
    assert_eq!(store.timetable_for_class(2), class_two_before);
    assert_eq!(store.load().timetable.len(), 152);
}

#[test]
fn replacement_restamps_the_target_class() {
    let store = store();
    store
        .replace_class_timetable(
            4,
            &[TimetableEntry::new(6, Weekday::Tuesday, "10:00-11:00", "Science", "Dr. Singh")],
        )
        .unwrap();

    let class_four = store.timetable_for_class(4);
    assert_eq!(class_four.len(), 1);
    assert_eq!(class_four[0].class, 4);
    assert_eq!(store.timetable_for_class(6).len(), 25);
}

#[test]
fn replacement_with_bad_slot_writes_nothing() {
    let store = store();
    let err = store
        .replace_class_timetable(
            3,
            &[TimetableEntry::new(3, Weekday::Monday, "9-10", "Art", "Mr. Verma")],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidTimeSlot(_))
    ));
    assert_eq!(store.timetable_for_class(3).len(), 25);
    assert_eq!(store.snapshots().storage().write_count(), 0);
}

#[test]
fn regenerating_one_class_rotates_subjects_across_days() {
    let store = store();
    store
        .replace_class_timetable(
            5,
            &[TimetableEntry::new(5, Weekday::Monday, "08:00-09:00", "Music", "Ms. Rao")],
        )
        .unwrap();
    let class_four_before = store.timetable_for_class(4);

    store.regenerate_class_timetable(5).unwrap();

    let week = store.timetable_for_class(5);
    assert_eq!(week.len(), 25);
    assert!(week.iter().all(|entry| entry.subject != "Music"));
    let tuesday_first = store
        .timetable_for_class_on(5, Weekday::Tuesday)
        .into_iter()
        .find(|entry| entry.time_slot == "09:00-10:00")
        .unwrap();
    assert_eq!(tuesday_first.subject, "Art");
    assert_eq!(tuesday_first.teacher, "Mr. Verma");
    assert_eq!(store.timetable_for_class(4), class_four_before);
    assert_eq!(store.load().timetable.len(), 175);
}

#[test]
fn set_and_remove_single_cells() {
    let store = store();
    let art = TimetableEntry::new(5, Weekday::Wednesday, "09:00-10:00", "Art", "Mr. Verma");

    store.set_timetable_entry(5, &art).unwrap();
    let wednesday = store.timetable_for_class_on(5, Weekday::Wednesday);
    assert_eq!(wednesday.len(), 5);
    assert!(wednesday.contains(&art));

    store
        .remove_timetable_entry(5, Weekday::Wednesday, "09:00-10:00")
        .unwrap();
    let grid = TimetableGrid::from_entries(store.timetable_for_class(5));
    assert!(!grid.is_scheduled(Weekday::Wednesday, "09:00-10:00"));
    assert_eq!(grid.len(), 24);

    assert!(matches!(
        store.remove_timetable_entry(5, Weekday::Saturday, "09:00-10:00"),
        Err(RepoError::NotFound {
            entity: EntityKind::TimetableEntry,
            ..
        })
    ));
}

#[test]
fn videos_are_stamped_and_listed_by_class() {
    let store = store();
    let first = store
        .create_video(&VideoLecture::draft(
            2,
            "Photosynthesis",
            "Chapter 4 recap",
            "https://videos.example/p4",
        ))
        .unwrap();
    store.clock().advance(Duration::minutes(5));
    let second = store
        .create_video(&VideoLecture::draft(3, "Fractions", "", "https://videos.example/f1"))
        .unwrap();

    assert!(first.starts_with("video_"));
    assert_ne!(first, second);
    let class_two = store.list_videos_by_class(2);
    assert_eq!(class_two.len(), 1);
    assert_eq!(class_two[0].video_id, first);
    assert_eq!(
        class_two[0].uploaded_at,
        Utc.with_ymd_and_hms(2025, 5, 12, 7, 30, 0).unwrap()
    );
    assert_eq!(store.list_videos().len(), 2);
}

#[test]
fn deleting_a_video_removes_only_that_video() {
    let store = store();
    let keep = store
        .create_video(&VideoLecture::draft(1, "Keep", "", "https://videos.example/k"))
        .unwrap();
    let drop = store
        .create_video(&VideoLecture::draft(1, "Drop", "", "https://videos.example/d"))
        .unwrap();

    store.delete_video(&drop).unwrap();

    let remaining = store.list_videos();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].video_id, keep);
    assert_eq!(store.delete_video(&drop).unwrap_err().code(), "not_found");
}
