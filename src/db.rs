// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;

use crate::models::Document;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Monthbook", "monthbook"));

pub const HOME_ENV: &str = "MONTHBOOK_HOME";
const DOCUMENT_KEY: &str = "ledger_v1";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        let dir = PathBuf::from(home);
        fs::create_dir_all(&dir).context("Failed to create data dir")?;
        return Ok(dir);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("monthbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- whole ledger documents, one JSON body per key
    CREATE TABLE IF NOT EXISTS documents(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// Reads the stored ledger. A missing or unreadable body yields an empty
/// document.
pub fn load_document(conn: &Connection) -> Result<Document> {
    let body = load_raw_document(conn)?;
    Ok(body.map(|b| Document::from_json(&b)).unwrap_or_default())
}

/// The stored JSON body exactly as written, before any normalization.
pub fn load_raw_document(conn: &Connection) -> Result<Option<String>> {
    conn.query_row(
        "SELECT body FROM documents WHERE key=?1",
        params![DOCUMENT_KEY],
        |r| r.get(0),
    )
    .optional()
    .context("Read stored ledger")
}

pub fn save_document(conn: &Connection, doc: &Document) -> Result<()> {
    let body = doc.to_json().context("Serialize ledger")?;
    conn.execute(
        "INSERT INTO documents(key, body, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET body=excluded.body, updated_at=excluded.updated_at",
        params![DOCUMENT_KEY, body],
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthKey;
    use rust_decimal::Decimal;

    #[test]
    fn document_survives_a_save_load_cycle() {
        let conn = open_in_memory().unwrap();
        assert_eq!(load_document(&conn).unwrap(), Document::default());

        let key: MonthKey = "2026-04".parse().unwrap();
        let mut doc = Document::default();
        doc.set_income_base(key, Decimal::from_str_exact("4200.75").unwrap());
        doc.add_installment(key, "Laptop", Decimal::new(350, 0), Some(10), Some(key));
        save_document(&conn, &doc).unwrap();

        assert_eq!(load_document(&conn).unwrap(), doc);
    }

    #[test]
    fn corrupt_body_loads_as_empty() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO documents(key, body) VALUES (?1, '{{{')",
            params![DOCUMENT_KEY],
        )
        .unwrap();
        assert_eq!(load_document(&conn).unwrap(), Document::default());
    }

    #[test]
    fn settings_upsert_and_clear() {
        let conn = open_in_memory().unwrap();
        set_setting(&conn, "currency", "BRL").unwrap();
        set_setting(&conn, "currency", "EUR").unwrap();
        assert_eq!(get_setting(&conn, "currency").unwrap().as_deref(), Some("EUR"));
        clear_setting(&conn, "currency").unwrap();
        assert_eq!(get_setting(&conn, "currency").unwrap(), None);
    }
}
