// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::Value;

use crate::app::App;
use crate::db;
use crate::models::Document;
use crate::utils::pretty_table;

const SEQUENCES: [&str; 5] = ["incomeExtra", "fixed", "card", "cardRecurring", "goals"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: &'static str,
    pub issue: &'static str,
    pub detail: String,
}

impl Finding {
    fn warn(issue: &'static str, detail: String) -> Self {
        Self { severity: "warn", issue, detail }
    }

    fn info(issue: &'static str, detail: String) -> Self {
        Self { severity: "info", issue, detail }
    }
}

pub fn handle(app: &App) -> Result<()> {
    let raw = db::load_raw_document(app.conn())?;
    let findings = diagnose(app.doc(), raw.as_deref());

    if findings.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = findings
            .into_iter()
            .map(|f| vec![f.severity.to_string(), f.issue.to_string(), f.detail])
            .collect();
        println!("{}", pretty_table(&["Severity", "Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn diagnose(doc: &Document, raw: Option<&str>) -> Vec<Finding> {
    let mut out = Vec::new();

    for (key, m) in &doc.months {
        for item in &m.card {
            if item.total_parts.is_some() != item.start_ym.is_some() {
                out.push(Finding::warn(
                    "installment_incomplete",
                    format!("{} {}: needs both parts and start month", key, item.name),
                ));
            }
        }
        for bill in &m.fixed {
            if bill.due_day < 1 || bill.due_day > key.days() {
                out.push(Finding::warn(
                    "due_day_out_of_range",
                    format!("{} {}: day {}", key, bill.name, bill.due_day),
                ));
            }
        }
        for goal in &m.goals {
            if goal.saved > goal.target {
                out.push(Finding::info(
                    "goal_exceeds_target",
                    format!("{} {}: {} of {}", key, goal.name, goal.saved, goal.target),
                ));
            }
        }
    }

    if let Some(raw) = raw {
        out.extend(stored_id_findings(raw));
    }
    out
}

/// Missing or duplicated ids in the stored body. Loading repairs them, so
/// these go away on the next write.
fn stored_id_findings(raw: &str) -> Vec<Finding> {
    let mut out = Vec::new();
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        out.push(Finding::warn(
            "unreadable_ledger",
            "stored ledger is not valid JSON".to_string(),
        ));
        return out;
    };
    let Some(months) = value.get("months").and_then(Value::as_object) else {
        return out;
    };
    for (key, record) in months {
        if record.get("income").is_some() {
            out.push(Finding::info(
                "legacy_income",
                format!("{}: old income field pending migration", key),
            ));
        }
        for seq in SEQUENCES {
            let Some(items) = record.get(seq).and_then(Value::as_array) else {
                continue;
            };
            let mut seen = BTreeSet::new();
            for item in items.iter().filter(|i| i.is_object()) {
                match item.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) {
                    None => out.push(Finding::warn("missing_id", format!("{} {}", key, seq))),
                    Some(id) if !seen.insert(id) => {
                        out.push(Finding::warn("duplicate_id", format!("{} {}: {}", key, seq, id)))
                    }
                    Some(_) => {}
                }
            }
        }
    }
    out
}
