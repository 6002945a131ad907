// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use dashpro_app::PreferenceMedium;
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "dashpro";

const PREFERENCE_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// SQLite-backed persistence medium for user preferences.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        validate_db_path(&path.to_string_lossy())?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    /// Create the preferences table if needed, then make sure an existing
    /// one has the columns this store writes.
    pub fn bootstrap(&self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create preferences table")?;

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info('preferences')")
            .context("inspect preferences table")?;
        let present = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("list preferences columns")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("read preferences columns")?;

        let missing: Vec<&str> = PREFERENCE_COLUMNS
            .into_iter()
            .filter(|column| !present.iter().any(|name| name == *column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "preferences table lacks column(s) {}; move the database aside so dashpro can recreate it",
                missing.join(", ")
            );
        }
        Ok(())
    }

    pub fn get_preference_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read preference {key}"))
    }

    pub fn put_preference_raw(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO preferences (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert preference {key}"))?;
        Ok(())
    }

    pub fn remove_preference_raw(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?", params![key])
            .with_context(|| format!("delete preference {key}"))?;
        Ok(())
    }
}

impl PreferenceMedium for Store {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.get_preference_raw(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.put_preference_raw(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_preference_raw(key)
    }
}

/// `DASHPRO_DB_PATH`, else `dashpro/dashpro.db` under the platform's local
/// data directory (created on demand).
pub fn default_db_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os("DASHPRO_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dir = dirs::data_local_dir()
        .map(|root| root.join(APP_NAME))
        .ok_or_else(|| anyhow!("no local data directory on this platform; set DASHPRO_DB_PATH"))?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("dashpro.db"))
}

/// Accept plain filesystem paths and `:memory:`. SQLite would treat URI
/// forms and query strings specially, so those are refused.
pub fn validate_db_path(path: &str) -> Result<()> {
    match path {
        "" => bail!("database path is empty"),
        ":memory:" => return Ok(()),
        _ => {}
    }

    let has_scheme = path.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|ch| ch.is_ascii_alphanumeric())
    });
    if has_scheme || path.starts_with("file:") {
        bail!("database path {path:?} looks like a URI; give a filesystem path");
    }
    if path.contains('?') {
        bail!("database path {path:?} has a query string; give a plain filesystem path");
    }
    Ok(())
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
