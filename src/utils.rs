// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::config;
use crate::month::MonthKey;

pub const MAX_PARTS: u32 = 999;

pub fn parse_month(s: &str) -> Result<MonthKey> {
    Ok(s.trim().parse::<MonthKey>()?)
}

/// `--month` when given, otherwise the remembered month.
pub fn month_arg(conn: &Connection, sub: &clap::ArgMatches) -> Result<MonthKey> {
    match sub.get_one::<String>("month") {
        Some(raw) => parse_month(raw),
        None => config::selected_month(conn),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Decimal that must be at least `min`.
pub fn parse_amount(s: &str, min: Decimal, what: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < min {
        return Err(anyhow!("{} must be at least {}, got {}", what, min, d));
    }
    Ok(d)
}

/// Amounts charged or earned: strictly positive, at least one cent.
pub fn parse_positive_amount(s: &str, what: &str) -> Result<Decimal> {
    parse_amount(s, Decimal::new(1, 2), what)
}

pub fn parse_non_negative_amount(s: &str, what: &str) -> Result<Decimal> {
    parse_amount(s, Decimal::ZERO, what)
}

pub fn require_name(s: &str, what: &str) -> Result<String> {
    let name = s.trim();
    if name.is_empty() {
        return Err(anyhow!("{} is required", what));
    }
    Ok(name.to_string())
}

pub fn parse_parts(s: &str) -> Result<u32> {
    let s = s.trim();
    let n = s
        .parse::<u32>()
        .with_context(|| format!("Invalid number of parts '{}'", s))?;
    if !(1..=MAX_PARTS).contains(&n) {
        return Err(anyhow!("Number of parts must be between 1 and {}, got {}", MAX_PARTS, n));
    }
    Ok(n)
}

/// Day of month valid for `month`.
pub fn parse_due_day(s: &str, month: MonthKey) -> Result<u32> {
    let s = s.trim();
    let day = s
        .parse::<u32>()
        .with_context(|| format!("Invalid due day '{}'", s))?;
    let last = month.days();
    if !(1..=last).contains(&day) {
        return Err(anyhow!("Due day must be between 1 and {} for {}, got {}", last, month, day));
    }
    Ok(day)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        other => Err(anyhow!("Invalid flag '{}', expected yes|no", other)),
    }
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_amount(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    let flag = |name: &str| {
        sub.try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    (flag("json"), flag("jsonl"))
}
