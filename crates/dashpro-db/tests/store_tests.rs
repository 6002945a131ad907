// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use dashpro_app::{PreferenceStore, THEME_KEY, ThemePreference};
use dashpro_db::{Store, validate_db_path};
use dashpro_testkit::temp_db_path;
use rusqlite::Connection;
use std::path::Path;

fn memory_store() -> Result<Store> {
    let store = Store::open(Path::new(":memory:"))?;
    store.bootstrap()?;
    Ok(store)
}

#[test]
fn validate_db_path_accepts_files_and_memory_only() {
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/dashpro.db").is_ok());
    assert!(validate_db_path("relative/dir/prefs.db").is_ok());

    for rejected in [
        "",
        "file:test.db",
        "https://example.com/db.sqlite",
        "db.sqlite?mode=ro",
    ] {
        assert!(validate_db_path(rejected).is_err(), "{rejected:?} accepted");
    }
}

#[test]
fn open_refuses_uri_paths_before_touching_disk() {
    let error = Store::open(Path::new("file:prefs.db?mode=memory"))
        .err()
        .map(|error| error.to_string());
    assert!(error.is_some_and(|message| message.contains("looks like a URI")));
}

#[test]
fn bootstrap_is_repeatable() -> Result<()> {
    let store = memory_store()?;
    store.put_preference_raw(THEME_KEY, "true")?;
    store.bootstrap()?;
    assert_eq!(store.get_preference_raw(THEME_KEY)?.as_deref(), Some("true"));
    Ok(())
}

#[test]
fn bootstrap_rejects_preferences_table_without_timestamp() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    Connection::open(&path)?
        .execute_batch("CREATE TABLE preferences (key TEXT PRIMARY KEY, value TEXT NOT NULL);")?;

    let store = Store::open(&path)?;
    let error = store
        .bootstrap()
        .expect_err("table without updated_at should be refused");
    let message = error.to_string();
    assert!(message.contains("lacks column(s) updated_at"));
    Ok(())
}

#[test]
fn bootstrap_leaves_unrelated_tables_alone() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    Connection::open(&path)?.execute_batch(
        "CREATE TABLE notes (id INTEGER PRIMARY KEY); INSERT INTO notes (id) VALUES (1);",
    )?;

    let store = Store::open(&path)?;
    store.bootstrap()?;
    store.put_preference_raw(THEME_KEY, "false")?;

    let notes: i64 =
        Connection::open(&path)?.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
    assert_eq!(notes, 1);
    Ok(())
}

#[test]
fn preference_upsert_overwrites_and_stamps() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let store = Store::open(&path)?;
    store.bootstrap()?;

    assert_eq!(store.get_preference_raw(THEME_KEY)?, None);
    store.put_preference_raw(THEME_KEY, "false")?;
    store.put_preference_raw(THEME_KEY, "true")?;
    assert_eq!(store.get_preference_raw(THEME_KEY)?.as_deref(), Some("true"));

    let (rows, stamp): (i64, String) = Connection::open(&path)?.query_row(
        "SELECT COUNT(*), MAX(updated_at) FROM preferences",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    assert_eq!(rows, 1);
    assert!(stamp.contains('T'), "expected an RFC 3339 stamp, got {stamp}");
    Ok(())
}

#[test]
fn remove_deletes_the_row() -> Result<()> {
    let store = memory_store()?;
    store.put_preference_raw(THEME_KEY, "true")?;
    store.remove_preference_raw(THEME_KEY)?;
    store.remove_preference_raw(THEME_KEY)?;
    assert_eq!(store.get_preference_raw(THEME_KEY)?, None);
    Ok(())
}

#[test]
fn theme_choice_survives_reopen() -> Result<()> {
    let (_dir, path) = temp_db_path()?;

    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        let mut preferences = PreferenceStore::new(store);
        let theme = ThemePreference::load(&mut preferences, true);
        assert!(theme.is_dark());
        theme.persist(&mut preferences)?;
    }

    let store = Store::open(&path)?;
    store.bootstrap()?;
    assert_eq!(store.get_preference_raw(THEME_KEY)?.as_deref(), Some("true"));

    let mut preferences = PreferenceStore::new(store);
    let mut theme = ThemePreference::load(&mut preferences, false);
    assert!(theme.is_dark());
    theme.toggle(&mut preferences)?;
    assert!(!preferences.get(THEME_KEY, true));
    Ok(())
}

#[test]
fn corrupt_stored_value_falls_back() -> Result<()> {
    let store = memory_store()?;
    store.put_preference_raw(THEME_KEY, "{not json")?;

    let preferences = PreferenceStore::new(store);
    assert!(preferences.get(THEME_KEY, true));
    assert!(!preferences.get(THEME_KEY, false));
    Ok(())
}

#[test]
fn unbootstrapped_store_reads_fall_back() -> Result<()> {
    let store = Store::open(Path::new(":memory:"))?;
    let mut preferences = PreferenceStore::new(store);
    assert!(preferences.get(THEME_KEY, true));

    let err = preferences
        .set(THEME_KEY, Some(&true))
        .expect_err("no preferences table yet");
    assert!(format!("{err:#}").contains("persist preference darkMode"));
    Ok(())
}
