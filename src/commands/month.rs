// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::app::App;
use crate::config;
use crate::ledger::{all_months, month_totals};
use crate::models::MonthRecord;
use crate::utils::{
    fmt_amount, fmt_money, json_flags, maybe_print_json, month_arg, parse_month,
    parse_non_negative_amount, parse_positive_amount, pretty_table, require_name,
};

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(app, sub),
        Some(("select", sub)) => select(app, sub),
        Some(("income", sub)) => income(app, sub),
        Some(("extra", sub)) => match sub.subcommand() {
            Some(("add", s)) => add_extra(app, s),
            Some(("list", s)) => list_extra(app, s),
            Some(("rm", s)) => remove_extra(app, s),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn show(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let ccy = config::currency(app.conn())?;
    let empty = MonthRecord::default();
    let record = app.doc().month(key).unwrap_or(&empty);
    let totals = month_totals(record);
    let months = all_months(app.doc());

    let (json_flag, jsonl_flag) = json_flags(sub);
    let payload = json!({ "month": key, "totals": totals, "months": months });
    if maybe_print_json(json_flag, jsonl_flag, &payload)? {
        return Ok(());
    }

    let paid = record.fixed.iter().filter(|f| f.paid).count();
    println!("{} ({})", key.label(), key);
    let kpis = vec![
        vec!["Income".into(), fmt_money(&totals.income, &ccy)],
        vec!["Fixed bills".into(), fmt_money(&totals.fixed, &ccy)],
        vec!["Card".into(), fmt_money(&totals.card, &ccy)],
        vec!["Saved toward goals".into(), fmt_money(&totals.goals_saved, &ccy)],
        vec!["Balance".into(), fmt_money(&totals.balance, &ccy)],
        vec![
            "Bills paid".into(),
            format!("{}/{}", paid, record.fixed.len()),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], kpis));

    if months.is_empty() {
        return Ok(());
    }
    let rows = months
        .iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                fmt_amount(&r.totals.income),
                fmt_amount(&r.totals.fixed),
                fmt_amount(&r.totals.card),
                fmt_amount(&r.totals.goals_saved),
                fmt_amount(&r.totals.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Fixed", "Card", "Goals", "Balance"], rows)
    );
    Ok(())
}

fn select(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("month").unwrap();
    let key = parse_month(raw)?;
    config::select_month(app.conn(), key)?;
    println!("Selected {}", key);
    Ok(())
}

fn income(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let amount = parse_non_negative_amount(sub.get_one::<String>("amount").unwrap(), "Income")?;
    app.update(|d| {
        d.set_income_base(key, amount);
        Ok(())
    })?;
    println!("Base income for {} set to {}", key, fmt_amount(&amount));
    Ok(())
}

fn add_extra(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let name = require_name(sub.get_one::<String>("name").unwrap(), "Name")?;
    let value = parse_positive_amount(sub.get_one::<String>("value").unwrap(), "Value")?;
    let id = app.update(|d| Ok(d.add_extra_income(key, &name, value)))?;
    println!("Added extra income {} ({}) to {}", name, id, key);
    Ok(())
}

fn list_extra(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let items = app
        .doc()
        .month(key)
        .map(|m| m.income_extra.as_slice())
        .unwrap_or_default();
    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|e| vec![e.id.clone(), e.name.clone(), fmt_amount(&e.value)])
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Value"], rows));
    Ok(())
}

fn remove_extra(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let removed = app.update(|d| d.remove_extra_income(key, id))?;
    println!("Removed extra income {} from {}", removed.name, key);
    Ok(())
}
