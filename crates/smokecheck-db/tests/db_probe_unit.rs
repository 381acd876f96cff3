// crates/smokecheck-db/tests/db_probe_unit.rs
// ============================================================================
// Module: DB Probe Unit Tests
// Description: Schema bootstrap, row dumps, user creation, and auth.
// Purpose: Verify the probe against real temp-file SQLite databases.
// Dependencies: smokecheck-db, tempfile
// ============================================================================

//! ## Overview
//! Exercises the probe end to end on temporary database files: schema
//! bootstrap, table listing, user create/delete/duplicate behavior, content
//! dumps, and the grant/denial outcomes of password authentication.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use smokecheck_db::AuthDenied;
use smokecheck_db::AuthOutcome;
use smokecheck_db::DbError;
use smokecheck_db::DbProbe;
use smokecheck_db::NewUser;

/// Opens a probe over a fresh database file in a temp directory.
fn fresh_probe(dir: &tempfile::TempDir) -> DbProbe {
    DbProbe::open(&dir.path().join("smoke.db")).unwrap()
}

/// Inputs for the standard smoke-test user.
fn test_user() -> NewUser {
    NewUser {
        username: "testuser".to_string(),
        email: "test@example.com".to_string(),
        password: "testpassword123".to_string(),
        role: "user".to_string(),
    }
}

#[test]
fn open_bootstraps_users_and_documents_tables() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    let tables = probe.table_names().unwrap();
    assert!(tables.contains(&"users".to_string()));
    assert!(tables.contains(&"documents".to_string()));
}

#[test]
fn created_user_appears_in_content_dump() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    let created = probe.create_user(&test_user()).unwrap();
    assert_eq!(created.username, "testuser");

    let users = probe.users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0], created);
}

#[test]
fn duplicate_username_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    probe.create_user(&test_user()).unwrap();
    let err = probe.create_user(&test_user()).unwrap_err();
    assert!(matches!(err, DbError::DuplicateUser(name) if name == "testuser"));
}

#[test]
fn delete_user_reports_whether_a_row_was_removed() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    probe.create_user(&test_user()).unwrap();
    assert!(probe.delete_user("testuser").unwrap());
    assert!(!probe.delete_user("testuser").unwrap());
    assert!(probe.find_user("testuser").unwrap().is_none());
}

#[test]
fn authenticate_grants_on_correct_password() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    probe.create_user(&test_user()).unwrap();

    match probe.authenticate("testuser", "testpassword123").unwrap() {
        AuthOutcome::Granted(user) => assert_eq!(user.username, "testuser"),
        AuthOutcome::Denied(denied) => panic!("unexpected denial: {}", denied.reason()),
    }
}

#[test]
fn authenticate_denies_wrong_password_with_structured_reason() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    probe.create_user(&test_user()).unwrap();

    let outcome = probe.authenticate("testuser", "wrongpassword").unwrap();
    assert_eq!(outcome, AuthOutcome::Denied(AuthDenied::WrongPassword));
}

#[test]
fn authenticate_denies_unknown_user() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    let outcome = probe.authenticate("nobody", "irrelevant").unwrap();
    assert_eq!(outcome, AuthOutcome::Denied(AuthDenied::UnknownUser));
}

#[test]
fn documents_dump_returns_inserted_rows() {
    let dir = tempfile::tempdir().unwrap();
    let probe = fresh_probe(&dir);
    let user = probe.create_user(&test_user()).unwrap();
    let doc_id = probe.insert_document("report.pdf", user.id).unwrap();

    let documents = probe.documents().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, doc_id);
    assert_eq!(documents[0].filename, "report.pdf");
    assert_eq!(documents[0].uploader_id, user.id);
}

#[test]
fn open_fails_for_unwritable_location() {
    let err = DbProbe::open(std::path::Path::new("/nonexistent-dir/smoke.db")).unwrap_err();
    assert!(matches!(err, DbError::Open(_)));
}
