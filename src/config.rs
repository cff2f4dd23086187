// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Settings kept in the local `settings` table.

use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{clear_setting, get_setting, set_setting};
use crate::month::MonthKey;

pub const CURRENCY: &str = "currency";
pub const REMOTE_URL: &str = "remote.url";
pub const REMOTE_API_KEY: &str = "remote.api_key";
pub const REMOTE_TABLE: &str = "remote.table";
pub const SESSION_USER: &str = "session.user_id";
pub const SESSION_TOKEN: &str = "session.token";
pub const LAST_MONTH: &str = "ui.last_month";
pub const DEBOUNCE_MS: &str = "mirror.debounce_ms";

pub const DEFAULT_CURRENCY: &str = "BRL";
pub const DEFAULT_TABLE: &str = "finance_state";
pub const DEFAULT_DEBOUNCE_MS: u64 = 350;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteConfig {
    pub url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub table: String,
}

/// The signed-in user. Only the id matters to the ledger; the token is
/// handed to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub token: String,
}

pub fn currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY)?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    set_setting(conn, CURRENCY, &ccy.trim().to_uppercase())
}

pub fn remote(conn: &Connection) -> Result<Option<RemoteConfig>> {
    let Some(url) = get_setting(conn, REMOTE_URL)?.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    Ok(Some(RemoteConfig {
        url: url.trim_end_matches('/').to_string(),
        api_key: get_setting(conn, REMOTE_API_KEY)?.unwrap_or_default(),
        table: get_setting(conn, REMOTE_TABLE)?.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
    }))
}

pub fn set_remote(conn: &Connection, url: &str, api_key: &str, table: Option<&str>) -> Result<()> {
    set_setting(conn, REMOTE_URL, url.trim())?;
    set_setting(conn, REMOTE_API_KEY, api_key.trim())?;
    set_setting(conn, REMOTE_TABLE, table.map(str::trim).unwrap_or(DEFAULT_TABLE))?;
    Ok(())
}

pub fn current_session(conn: &Connection) -> Result<Option<Session>> {
    let Some(user_id) = get_setting(conn, SESSION_USER)?.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    Ok(Some(Session {
        user_id,
        token: get_setting(conn, SESSION_TOKEN)?.unwrap_or_default(),
    }))
}

pub fn sign_in(conn: &Connection, user_id: &str, token: &str) -> Result<()> {
    set_setting(conn, SESSION_USER, user_id.trim())?;
    set_setting(conn, SESSION_TOKEN, token.trim())?;
    Ok(())
}

/// Clears the session together with the remembered month.
pub fn sign_out(conn: &Connection) -> Result<()> {
    clear_setting(conn, SESSION_USER)?;
    clear_setting(conn, SESSION_TOKEN)?;
    clear_setting(conn, LAST_MONTH)?;
    Ok(())
}

/// Remembered month, falling back to the current one.
pub fn selected_month(conn: &Connection) -> Result<MonthKey> {
    Ok(get_setting(conn, LAST_MONTH)?
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(MonthKey::current))
}

pub fn select_month(conn: &Connection, key: MonthKey) -> Result<()> {
    set_setting(conn, LAST_MONTH, &key.to_string())
}

pub fn debounce(conn: &Connection) -> Result<Duration> {
    let ms = match get_setting(conn, DEBOUNCE_MS)? {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid {} '{}'", DEBOUNCE_MS, raw))?,
        None => DEFAULT_DEBOUNCE_MS,
    };
    Ok(Duration::from_millis(ms))
}

pub fn set_debounce(conn: &Connection, ms: u64) -> Result<()> {
    set_setting(conn, DEBOUNCE_MS, &ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn defaults_apply_when_nothing_is_stored() {
        let conn = open_in_memory().unwrap();
        assert_eq!(currency(&conn).unwrap(), "BRL");
        assert_eq!(remote(&conn).unwrap(), None);
        assert_eq!(current_session(&conn).unwrap(), None);
        assert_eq!(debounce(&conn).unwrap(), Duration::from_millis(350));
        assert_eq!(selected_month(&conn).unwrap(), MonthKey::current());
    }

    #[test]
    fn sign_out_forgets_session_and_month() {
        let conn = open_in_memory().unwrap();
        sign_in(&conn, " user-1 ", "tok").unwrap();
        select_month(&conn, "2026-06".parse().unwrap()).unwrap();
        assert_eq!(current_session(&conn).unwrap().unwrap().user_id, "user-1");

        sign_out(&conn).unwrap();
        assert_eq!(current_session(&conn).unwrap(), None);
        assert_eq!(get_setting(&conn, LAST_MONTH).unwrap(), None);
    }

    #[test]
    fn remote_url_is_trimmed_of_trailing_slash() {
        let conn = open_in_memory().unwrap();
        set_remote(&conn, "https://db.example.com/", "anon", None).unwrap();
        let r = remote(&conn).unwrap().unwrap();
        assert_eq!(r.url, "https://db.example.com");
        assert_eq!(r.table, "finance_state");
    }
}
