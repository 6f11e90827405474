// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use npgen_app::{SettingKey, parse_stored_flag, stored_flag};
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "npgen";

const SETTINGS_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn bootstrap(&self) -> Result<()> {
        if !check_settings_table(&self.conn)? {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    fn get_setting_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read setting {key}"))
    }

    fn put_setting_raw(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert setting {key}"))?;
        Ok(())
    }

    /// `None` when the flag was never saved.
    pub fn get_dark_mode_override(&self) -> Result<Option<bool>> {
        let key = SettingKey::DarkMode;
        let Some(raw) = self.get_setting_raw(key.as_str())? else {
            return Ok(None);
        };
        parse_stored_flag(&raw).map(Some).ok_or_else(|| {
            anyhow!(
                "setting `{}` has invalid value `{raw}`; toggle {} again to overwrite it",
                key.as_str(),
                key.label()
            )
        })
    }

    pub fn put_dark_mode(&self, dark: bool) -> Result<()> {
        self.put_setting_raw(SettingKey::DarkMode.as_str(), stored_flag(dark))
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("NPGEN_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    Ok(data_dir()?.join("npgen.db"))
}

pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set NPGEN_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

/// `Ok(false)` for an empty database. An existing database must carry the
/// settings table with all of its columns.
fn check_settings_table(conn: &Connection) -> Result<bool> {
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )
        .context("inspect database tables")?;
    if tables == 0 {
        return Ok(false);
    }

    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('settings')")
        .context("inspect settings columns")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query settings columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("read settings columns")?;
    if columns.is_empty() {
        bail!(
            "database is missing required table `settings`; point [storage].db_path at an npgen database"
        );
    }

    let missing: Vec<&str> = SETTINGS_COLUMNS
        .into_iter()
        .filter(|column| !columns.iter().any(|name| name.as_str() == *column))
        .collect();
    if !missing.is_empty() {
        bail!(
            "table `settings` is missing columns: {}; remove the database to recreate it",
            missing.join(", ")
        );
    }
    Ok(true)
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
