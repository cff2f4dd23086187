// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::app::App;
use crate::config;
use crate::ledger::total_fixed;
use crate::models::{Document, FixedExpense};
use crate::month::MonthKey;
use crate::utils::{
    fmt_amount, fmt_money, json_flags, maybe_print_json, month_arg, parse_bool, parse_due_day,
    parse_positive_amount, pretty_table, require_name,
};

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("paid", sub)) => paid(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        _ => Ok(()),
    }
}

fn add(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let name = require_name(sub.get_one::<String>("name").unwrap(), "Name")?;
    let value = parse_positive_amount(sub.get_one::<String>("value").unwrap(), "Value")?;
    let due_day = parse_due_day(sub.get_one::<String>("due_day").unwrap(), key)?;
    let id = app.update(|d| Ok(d.add_fixed(key, &name, value, due_day)))?;
    println!("Added bill {} ({}) due on day {} of {}", name, id, due_day, key);
    Ok(())
}

/// Bills of `key` in the order they were added.
pub fn listed_bills(doc: &Document, key: MonthKey) -> &[FixedExpense] {
    doc.month(key).map(|m| m.fixed.as_slice()).unwrap_or_default()
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let bills = listed_bills(app.doc(), key);

    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &bills)? {
        return Ok(());
    }
    let rows = bills
        .iter()
        .map(|f| {
            vec![
                f.id.clone(),
                f.name.clone(),
                f.due_day.to_string(),
                fmt_amount(&f.value),
                if f.paid { "paid" } else { "open" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Due", "Value", "Status"], rows)
    );
    let ccy = config::currency(app.conn())?;
    let total = app.doc().month(key).map(total_fixed).unwrap_or_default();
    println!("Total: {}", fmt_money(&total, &ccy));
    Ok(())
}

fn paid(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let flag = parse_bool(sub.get_one::<String>("paid").unwrap())?;
    app.update(|d| d.set_fixed_paid(key, id, flag))?;
    println!(
        "Bill {} marked {} for {}",
        id,
        if flag { "paid" } else { "unpaid" },
        key
    );
    Ok(())
}

fn remove(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let removed = app.update(|d| d.remove_fixed(key, id))?;
    println!("Removed bill {} from {}", removed.name, key);
    Ok(())
}
