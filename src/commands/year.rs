// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::app::App;
use crate::config;
use crate::ledger::{YearReport, year_report};
use crate::models::Document;
use crate::month::MonthKey;
use crate::utils::{fmt_amount, fmt_money, json_flags, maybe_print_json, pretty_table};

pub fn handle(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let year = resolve_year(app.doc(), sub.get_one::<i32>("year").copied());
    let report = year_report(app.doc(), year);

    let (json_flag, jsonl_flag) = json_flags(sub);
    if jsonl_flag {
        return maybe_print_json(false, true, &report.months).map(|_| ());
    }
    if maybe_print_json(json_flag, false, &report)? {
        return Ok(());
    }

    let ccy = config::currency(app.conn())?;
    print_report(&report, &ccy);
    Ok(())
}

/// Requested year, else the latest year with data, else the current one.
pub fn resolve_year(doc: &Document, requested: Option<i32>) -> i32 {
    requested
        .or_else(|| doc.years().last().copied())
        .unwrap_or_else(|| MonthKey::current().year())
}

fn print_report(report: &YearReport, ccy: &str) {
    if report.months.is_empty() {
        println!("No months recorded for {}", report.year);
        return;
    }
    let mut rows: Vec<Vec<String>> = report
        .months
        .iter()
        .map(|r| {
            vec![
                r.month.label(),
                fmt_amount(&r.totals.income),
                fmt_amount(&r.totals.fixed),
                fmt_amount(&r.totals.card),
                fmt_amount(&r.totals.goals_saved),
                fmt_amount(&r.totals.balance),
            ]
        })
        .collect();
    let t = &report.totals;
    rows.push(vec![
        "Total".into(),
        fmt_amount(&t.income),
        fmt_amount(&t.fixed),
        fmt_amount(&t.card),
        fmt_amount(&t.goals_saved),
        fmt_amount(&t.balance),
    ]);
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Fixed", "Card", "Goals", "Balance"], rows)
    );

    let month_or_dash = |m: Option<MonthKey>| m.map(|k| k.label()).unwrap_or_else(|| "-".into());
    let largest = report
        .largest_category
        .map(|(c, v)| format!("{} ({})", c.label(), fmt_money(&v, ccy)))
        .unwrap_or_else(|| "-".into());
    let kpis = vec![
        vec!["Best month".into(), month_or_dash(report.best_month)],
        vec!["Worst month".into(), month_or_dash(report.worst_month)],
        vec!["Average balance".into(), fmt_money(&report.average_balance, ccy)],
        vec!["Largest expense".into(), largest],
    ];
    let year = report.year.to_string();
    println!("{}", pretty_table(&[year.as_str(), ""], kpis));
}
