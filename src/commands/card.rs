// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::app::App;
use crate::config;
use crate::ledger::{InstallmentStatus, total_active_subscriptions, total_card, total_installments};
use crate::models::{Installment, MonthRecord};
use crate::month::MonthKey;
use crate::utils::{
    fmt_amount, fmt_money, json_flags, maybe_print_json, month_arg, parse_bool, parse_month,
    parse_parts, parse_positive_amount, pretty_table, require_name,
};

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        Some(("sub", sub)) => match sub.subcommand() {
            Some(("add", s)) => add_subscription(app, s),
            Some(("list", s)) => list_subscriptions(app, s),
            Some(("toggle", s)) => toggle_subscription(app, s),
            Some(("rm", s)) => remove_subscription(app, s),
            Some(("copy-prev", s)) => copy_previous(app, s),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn add(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let name = require_name(sub.get_one::<String>("name").unwrap(), "Name")?;
    let value = parse_positive_amount(sub.get_one::<String>("value").unwrap(), "Monthly value")?;
    let parts = sub
        .get_one::<String>("parts")
        .map(|s| parse_parts(s))
        .transpose()?;
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_month(s))
        .transpose()?;
    let id = app.update(|d| Ok(d.add_installment(key, &name, value, parts, start)))?;
    println!("Added installment {} ({}) to {}", name, id, key);
    Ok(())
}

/// An installment as seen from one reference month.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView<'a> {
    #[serde(flatten)]
    pub item: &'a Installment,
    pub end: Option<MonthKey>,
    /// Months left counting the reference month; 0 once finished.
    pub remaining_parts: Option<u32>,
    #[serde(flatten)]
    pub status: InstallmentStatus,
}

/// Installments of `record` in insertion order, relative to `reference`.
pub fn installment_views(record: &MonthRecord, reference: MonthKey) -> Vec<InstallmentView<'_>> {
    record
        .card
        .iter()
        .map(|item| InstallmentView {
            item,
            end: item.end_month(),
            remaining_parts: item.remaining(reference),
            status: item.status(reference),
        })
        .collect()
}

fn describe(status: &InstallmentStatus) -> String {
    match status {
        InstallmentStatus::Unknown => "-".to_string(),
        InstallmentStatus::NotStarted { starts } => format!("starts {}", starts),
        InstallmentStatus::Active { remaining, paid } => {
            format!("{}/{} paid, {} left", paid, paid + remaining, remaining)
        }
        InstallmentStatus::Finished => "finished".to_string(),
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let record = app.doc().month(key).cloned().unwrap_or_default();
    let views = installment_views(&record, key);

    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &views)? {
        return Ok(());
    }
    let rows = views
        .iter()
        .map(|v| {
            vec![
                v.item.id.clone(),
                v.item.name.clone(),
                fmt_amount(&v.item.month_value),
                opt(v.item.total_parts),
                opt(v.item.start_ym),
                opt(v.end),
                opt(v.remaining_parts),
                describe(&v.status),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Monthly", "Parts", "Start", "End", "Remaining", "Status"],
            rows
        )
    );
    let ccy = config::currency(app.conn())?;
    println!(
        "Installments: {}  Subscriptions: {}  Card total: {}",
        fmt_money(&total_installments(&record), &ccy),
        fmt_money(&total_active_subscriptions(&record), &ccy),
        fmt_money(&total_card(&record), &ccy)
    );
    Ok(())
}

fn remove(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let removed = app.update(|d| d.remove_installment(key, id))?;
    println!("Removed installment {} from {}", removed.name, key);
    Ok(())
}

fn add_subscription(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let name = require_name(sub.get_one::<String>("name").unwrap(), "Name")?;
    let value = parse_positive_amount(sub.get_one::<String>("value").unwrap(), "Value")?;
    let id = app.update(|d| Ok(d.add_subscription(key, &name, value)))?;
    println!("Added subscription {} ({}) to {}", name, id, key);
    Ok(())
}

fn list_subscriptions(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let items = app
        .doc()
        .month(key)
        .map(|m| m.card_recurring.as_slice())
        .unwrap_or_default();
    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                fmt_amount(&s.value),
                if s.active { "active" } else { "paused" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Value", "State"], rows));
    Ok(())
}

fn toggle_subscription(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let wanted = sub
        .get_one::<String>("active")
        .map(|s| parse_bool(s))
        .transpose()?;
    let active = app.update(|d| {
        let current = d
            .month(key)
            .and_then(|m| m.card_recurring.iter().find(|s| &s.id == id))
            .map(|s| s.active)
            .unwrap_or(false);
        let next = wanted.unwrap_or(!current);
        d.set_subscription_active(key, id, next)?;
        Ok(next)
    })?;
    println!(
        "Subscription {} is now {} in {}",
        id,
        if active { "active" } else { "paused" },
        key
    );
    Ok(())
}

fn remove_subscription(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let removed = app.update(|d| d.remove_subscription(key, id))?;
    println!("Removed subscription {} from {}", removed.name, key);
    Ok(())
}

fn copy_previous(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let n = app.update(|d| d.copy_subscriptions_from_previous(key))?;
    println!("Copied {} subscription(s) into {}", n, key);
    Ok(())
}
