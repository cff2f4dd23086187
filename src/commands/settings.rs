// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

use crate::config;
use crate::db;
use crate::utils::{json_flags, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap();
            if ccy.trim().is_empty() {
                return Err(anyhow!("Currency is required"));
            }
            config::set_currency(conn, ccy)?;
            println!("Currency set to {}", config::currency(conn)?);
        }
        Some(("set-remote", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(anyhow!("Remote URL must start with http:// or https://, got '{}'", url));
            }
            let api_key = sub.get_one::<String>("api_key").unwrap();
            let table = sub.get_one::<String>("table").map(|s| s.as_str());
            config::set_remote(conn, url, api_key, table)?;
            println!("Remote store set to {}", url.trim());
        }
        Some(("set-debounce", sub)) => {
            let ms = *sub.get_one::<u64>("ms").unwrap();
            config::set_debounce(conn, ms)?;
            println!("Remote writes debounced by {} ms", ms);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let remote = config::remote(conn)?;
    let session = config::current_session(conn)?;
    let payload = json!({
        "data_dir": db::data_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "-".into()),
        "currency": config::currency(conn)?,
        "remote": remote,
        "session": session,
        "selected_month": config::selected_month(conn)?,
        "debounce_ms": u64::try_from(config::debounce(conn)?.as_millis()).unwrap_or(u64::MAX),
    });
    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &payload)? {
        return Ok(());
    }

    let rows = vec![
        vec!["Data dir".into(), payload["data_dir"].as_str().unwrap_or_default().to_string()],
        vec!["Currency".into(), config::currency(conn)?],
        vec![
            "Remote".into(),
            remote
                .as_ref()
                .map(|r| format!("{} ({})", r.url, r.table))
                .unwrap_or_else(|| "-".into()),
        ],
        vec![
            "Signed in as".into(),
            session.map(|s| s.user_id).unwrap_or_else(|| "-".into()),
        ],
        vec!["Selected month".into(), config::selected_month(conn)?.to_string()],
        vec!["Debounce (ms)".into(), payload["debounce_ms"].to_string()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
