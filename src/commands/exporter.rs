// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};

use crate::app::App;
use crate::ledger::all_months;
use crate::utils::fmt_amount;

pub const CSV_HEADER: [&str; 6] = ["month", "income", "fixed", "card", "goals_saved", "balance"];

pub fn handle(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(b';')
                .from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record(CSV_HEADER)?;
            for row in all_months(app.doc()) {
                let t = row.totals;
                wtr.write_record([
                    row.month.to_string(),
                    fmt_amount(&t.income),
                    fmt_amount(&t.fixed),
                    fmt_amount(&t.card),
                    fmt_amount(&t.goals_saved),
                    fmt_amount(&t.balance),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(app.doc())?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!("Exported ledger to {}", out);
    Ok(())
}
