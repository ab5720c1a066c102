use quicknote_core::db::migrations::latest_version;
use quicknote_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

fn kv_columns(conn: &Connection) -> Vec<(String, bool)> {
    let mut stmt = conn.prepare("PRAGMA table_info(kv_entries);").unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>("name")?, row.get::<_, i64>("notnull")? == 1))
        })
        .unwrap();
    rows.map(|row| row.unwrap()).collect()
}

#[test]
fn fresh_database_gets_kv_entries_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert_eq!(
        kv_columns(&conn),
        vec![
            ("key".to_string(), true),
            ("value".to_string(), true),
            ("updated_at".to_string(), true),
        ]
    );
}

#[test]
fn kv_entries_rejects_empty_and_duplicate_keys() {
    let conn = open_db_in_memory().unwrap();

    let empty = conn.execute("INSERT INTO kv_entries (key, value) VALUES ('', '[]');", []);
    assert!(empty.is_err(), "empty key must violate the CHECK constraint");

    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('notes', '[]');",
        [],
    )
    .unwrap();
    let duplicate = conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('notes', '[\"x\"]');",
        [],
    );
    assert!(duplicate.is_err(), "key is the primary key");
}

#[test]
fn kv_entries_stamps_updated_at_on_insert() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('notes', '[]');",
        [],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_entries WHERE key = 'notes';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(
        updated_at > 1_600_000_000_000,
        "expected epoch millis, got {updated_at}"
    );
}

#[test]
fn reopening_file_skips_applied_migrations_and_keeps_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicknote.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES ('notes', '[\"a\"]');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let blob: String = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'notes';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(blob, "[\"a\"]");
}

#[test]
fn newer_schema_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_schema_too_new");
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported } if latest_supported == latest_version()
    ));
}

#[test]
fn missing_parent_directory_reports_open_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("notes.db");

    match open_db(&path).unwrap_err() {
        DbError::Open { target, .. } => assert!(target.ends_with("notes.db")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn name_clash_with_existing_index_fails_migration_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE legacy (slot TEXT);
             CREATE INDEX kv_entries ON legacy (slot);",
        )
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 1),
        other => panic!("unexpected error: {other}"),
    }
}
