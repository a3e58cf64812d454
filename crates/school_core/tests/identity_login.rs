use school_core::bootstrap::{DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD, DEFAULT_STUDENT_PASSWORD};
use school_core::db::open_db_in_memory;
use school_core::{IdentityLookup, SchoolStore, StudentRepository};

#[test]
fn default_admin_can_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let store = SchoolStore::sqlite(&conn);

    let admin = store
        .authenticate_admin(DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD)
        .unwrap();
    assert_eq!(admin.admin_id, DEFAULT_ADMIN_ID);
    assert!(store.authenticate_admin(DEFAULT_ADMIN_ID, "wrong").is_none());
}

#[test]
fn student_sign_in_uses_current_password() {
    let conn = open_db_in_memory().unwrap();
    let store = SchoolStore::sqlite(&conn);

    let student = store
        .authenticate_student("20250612", DEFAULT_STUDENT_PASSWORD)
        .unwrap();
    assert_eq!(student.class, 6);

    store
        .update_student_password("20250612", "fresh-pass")
        .unwrap();
    assert!(store
        .authenticate_student("20250612", DEFAULT_STUDENT_PASSWORD)
        .is_none());
    assert!(store
        .authenticate_student("20250612", "fresh-pass")
        .is_some());
}

#[test]
fn ids_are_not_interchangeable_between_roles() {
    let conn = open_db_in_memory().unwrap();
    let store = SchoolStore::sqlite(&conn);

    assert!(store
        .authenticate_student(DEFAULT_ADMIN_ID, DEFAULT_ADMIN_PASSWORD)
        .is_none());
    assert!(store
        .authenticate_admin("20250101", DEFAULT_STUDENT_PASSWORD)
        .is_none());
}
