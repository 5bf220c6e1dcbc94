//! Store lifecycle and schema integration tests

use record_store::app::{person_insert, person_list};
use record_store::infra::{ensure_schema, Store};
use rusqlite::Connection;
use std::path::Path;

fn open_ready(path: &Path) -> Store {
    let store = Store::open(path).unwrap();
    ensure_schema(&store).unwrap();
    store
}

// ──────────────────────── open ────────────────────────

#[test]
fn open_creates_missing_file_and_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("test.db");
    let mut store = Store::open(&path).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(!store.is_closed());
    store.close().unwrap();
    assert!(path.exists());
}

#[test]
fn open_corrupt_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    std::fs::write(&path, "this is not an sqlite database\n".repeat(64)).unwrap();

    let err = Store::open(&path).unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
    assert!(err.to_string().contains("corrupt.db"));
}

#[test]
fn open_under_a_regular_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let err = Store::open(&blocker.join("test.db")).unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
}

#[test]
fn open_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = Store::open(dir.path()).unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
}

// ──────────────────────── ensure_schema ────────────────────────

#[test]
fn ensure_schema_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::open(&path).unwrap();

    assert!(ensure_schema(&store).unwrap());
    person_insert(&store, "Alice").unwrap();
    assert!(!ensure_schema(&store).unwrap());

    let people = person_list(&store).unwrap().to_vec().unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Alice");
}

#[test]
fn ensure_schema_accepts_table_created_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS people (\n id INTEGER PRIMARY KEY AUTOINCREMENT,\n name TEXT NOT NULL\n);
             INSERT INTO people(name) VALUES ('Existing');",
        )
        .unwrap();
    }

    let store = open_ready(&path);
    assert_eq!(person_insert(&store, "New").unwrap(), 2);
}

#[test]
fn ensure_schema_accepts_mixed_case_table_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE People (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
             INSERT INTO People(name) VALUES ('Existing');",
        )
        .unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert!(!ensure_schema(&store).unwrap());
    assert_eq!(person_insert(&store, "New").unwrap(), 2);
    assert_eq!(person_list(&store).unwrap().to_vec().unwrap().len(), 2);
}

#[test]
fn ensure_schema_rejects_wrong_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE people (id TEXT PRIMARY KEY, name TEXT)")
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let err = ensure_schema(&store).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_ERROR");
}

#[test]
fn ensure_schema_rejects_extra_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE people (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, email TEXT NOT NULL)",
        )
        .unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(ensure_schema(&store).unwrap_err().code(), "SCHEMA_ERROR");
}

#[test]
fn ensure_schema_rejects_missing_autoincrement() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let err = ensure_schema(&store).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_ERROR");
    assert!(err.to_string().contains("AUTOINCREMENT"));
}

#[test]
fn ensure_schema_rejects_view_named_people() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE VIEW people AS SELECT 1 AS id, 'x' AS name")
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(ensure_schema(&store).unwrap_err().code(), "SCHEMA_ERROR");
}

#[test]
fn operations_without_schema_report_schema_error() {
    let store = Store::open_in_memory().unwrap();
    assert_eq!(person_insert(&store, "Alice").unwrap_err().code(), "SCHEMA_ERROR");
    assert_eq!(person_list(&store).unwrap_err().code(), "SCHEMA_ERROR");
}

// ──────────────────────── persistence ────────────────────────

#[test]
fn records_survive_reopen_and_ids_continue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");

    let mut store = open_ready(&path);
    person_insert(&store, "Alice").unwrap();
    store.close().unwrap();

    let mut store = open_ready(&path);
    assert_eq!(person_insert(&store, "Bob").unwrap(), 2);
    let names: Vec<String> = person_list(&store)
        .unwrap()
        .iter()
        .map(|r| r.unwrap().name)
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    store.close().unwrap();
}

#[test]
fn ids_are_never_reused_after_external_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");

    let mut store = open_ready(&path);
    person_insert(&store, "Alice").unwrap();
    person_insert(&store, "Bob").unwrap();
    store.close().unwrap();

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute("DELETE FROM people WHERE id = 2", []).unwrap();
    }

    let store = open_ready(&path);
    assert_eq!(person_insert(&store, "Carol").unwrap(), 3);
}

// ──────────────────────── close ────────────────────────

#[test]
fn closed_store_rejects_operations() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_ready(&dir.path().join("test.db"));
    person_insert(&store, "Alice").unwrap();
    store.close().unwrap();

    assert!(store.is_closed());
    assert_eq!(person_insert(&store, "Bob").unwrap_err().code(), "STORE_CLOSED");
    assert_eq!(person_list(&store).unwrap_err().code(), "STORE_CLOSED");
    assert_eq!(ensure_schema(&store).unwrap_err().code(), "STORE_CLOSED");
    assert_eq!(store.close().unwrap_err().code(), "STORE_CLOSED");
}

#[test]
fn closed_store_rejects_blank_input_as_invalid_first() {
    let mut store = record_store::infra::db::init_test_db();
    store.close().unwrap();
    // Input is validated before the handle is touched.
    assert_eq!(person_insert(&store, " ").unwrap_err().code(), "INVALID_INPUT");
}
