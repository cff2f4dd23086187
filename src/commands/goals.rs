// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;

use crate::app::App;
use crate::config;
use crate::ledger::total_goals_saved;
use crate::models::Goal;
use crate::utils::{
    fmt_amount, fmt_money, json_flags, maybe_print_json, month_arg, parse_non_negative_amount,
    parse_positive_amount, pretty_table, require_name,
};

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("saved", sub)) => saved(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        _ => Ok(()),
    }
}

/// Share of the target already saved, capped at 100.
pub fn progress(goal: &Goal) -> Decimal {
    if goal.target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (goal.saved * Decimal::ONE_HUNDRED / goal.target)
        .min(Decimal::ONE_HUNDRED)
        .round_dp(1)
}

fn add(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let name = require_name(sub.get_one::<String>("name").unwrap(), "Name")?;
    let target = parse_positive_amount(sub.get_one::<String>("target").unwrap(), "Target")?;
    let saved = match sub.get_one::<String>("saved") {
        Some(s) => parse_non_negative_amount(s, "Saved")?,
        None => Decimal::ZERO,
    };
    let id = app.update(|d| Ok(d.add_goal(key, &name, target, saved)))?;
    println!("Added goal {} ({}) to {}", name, id, key);
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let record = app.doc().month(key).cloned().unwrap_or_default();
    let (json_flag, jsonl_flag) = json_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &record.goals)? {
        return Ok(());
    }
    let rows = record
        .goals
        .iter()
        .map(|g| {
            vec![
                g.id.clone(),
                g.name.clone(),
                fmt_amount(&g.target),
                fmt_amount(&g.saved),
                format!("{}%", progress(g)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Target", "Saved", "Progress"], rows)
    );
    let ccy = config::currency(app.conn())?;
    println!("Saved this month: {}", fmt_money(&total_goals_saved(&record), &ccy));
    Ok(())
}

fn saved(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let amount = parse_non_negative_amount(sub.get_one::<String>("amount").unwrap(), "Saved")?;
    app.update(|d| d.set_goal_saved(key, id, amount))?;
    println!("Goal {} now has {} saved in {}", id, fmt_amount(&amount), key);
    Ok(())
}

fn remove(app: &mut App, sub: &clap::ArgMatches) -> Result<()> {
    let key = month_arg(app.conn(), sub)?;
    let id = sub.get_one::<String>("id").unwrap();
    let removed = app.update(|d| d.remove_goal(key, id))?;
    println!("Removed goal {} from {}", removed.name, key);
    Ok(())
}
