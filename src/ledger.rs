// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month and year totals, and the installment lifecycle relative to a
//! reference month. Every page-level view goes through these functions.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Document, Installment, MonthRecord};
use crate::month::MonthKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub fixed: Decimal,
    pub card: Decimal,
    pub goals_saved: Decimal,
    pub balance: Decimal,
}

impl MonthTotals {
    pub fn expenses(&self) -> Decimal {
        self.fixed + self.card + self.goals_saved
    }
}

pub fn total_income(m: &MonthRecord) -> Decimal {
    m.income_base + m.income_extra.iter().map(|e| e.value).sum::<Decimal>()
}

/// Paid status is informational and does not reduce the total.
pub fn total_fixed(m: &MonthRecord) -> Decimal {
    m.fixed.iter().map(|f| f.value).sum()
}

pub fn total_installments(m: &MonthRecord) -> Decimal {
    m.card.iter().map(|c| c.month_value).sum()
}

pub fn total_active_subscriptions(m: &MonthRecord) -> Decimal {
    m.card_recurring
        .iter()
        .filter(|s| s.active)
        .map(|s| s.value)
        .sum()
}

pub fn total_card(m: &MonthRecord) -> Decimal {
    total_installments(m) + total_active_subscriptions(m)
}

pub fn total_goals_saved(m: &MonthRecord) -> Decimal {
    m.goals.iter().map(|g| g.saved).sum()
}

pub fn balance(m: &MonthRecord) -> Decimal {
    total_income(m) - total_fixed(m) - total_card(m) - total_goals_saved(m)
}

pub fn month_totals(m: &MonthRecord) -> MonthTotals {
    let income = total_income(m);
    let fixed = total_fixed(m);
    let card = total_card(m);
    let goals_saved = total_goals_saved(m);
    MonthTotals {
        income,
        fixed,
        card,
        goals_saved,
        balance: income - fixed - card - goals_saved,
    }
}

/// Where an installment stands in a given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Start month or part count missing.
    Unknown,
    NotStarted { starts: MonthKey },
    Active { remaining: u32, paid: u32 },
    Finished,
}

impl Installment {
    /// Last charged month: `start + total_parts - 1`.
    pub fn end_month(&self) -> Option<MonthKey> {
        let start = self.start_ym?;
        let parts = self.total_parts.filter(|p| *p > 0)?;
        start.add_months(i64::from(parts) - 1)
    }

    pub fn status(&self, reference: MonthKey) -> InstallmentStatus {
        let (Some(start), Some(parts), Some(end)) = (self.start_ym, self.total_parts, self.end_month())
        else {
            return InstallmentStatus::Unknown;
        };
        if reference < start {
            return InstallmentStatus::NotStarted { starts: start };
        }
        let cur = reference.to_index();
        let end_idx = end.to_index();
        if cur > end_idx {
            return InstallmentStatus::Finished;
        }
        let remaining = u32::try_from(end_idx - cur + 1).unwrap_or(parts);
        InstallmentStatus::Active {
            remaining,
            paid: parts.saturating_sub(remaining),
        }
    }

    /// Months left, counting `reference` itself. `None` while the lifecycle
    /// is unknown or has not started yet.
    pub fn remaining(&self, reference: MonthKey) -> Option<u32> {
        match self.status(reference) {
            InstallmentStatus::Active { remaining, .. } => Some(remaining),
            InstallmentStatus::Finished => Some(0),
            InstallmentStatus::Unknown | InstallmentStatus::NotStarted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Fixed,
    Card,
    Goals,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Fixed => "Fixed",
            ExpenseCategory::Card => "Card",
            ExpenseCategory::Goals => "Goals",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    pub month: MonthKey,
    #[serde(flatten)]
    pub totals: MonthTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearReport {
    pub year: i32,
    pub months: Vec<MonthRow>,
    pub totals: MonthTotals,
    pub best_month: Option<MonthKey>,
    pub worst_month: Option<MonthKey>,
    pub average_balance: Decimal,
    pub largest_category: Option<(ExpenseCategory, Decimal)>,
}

/// Totals for every stored month, oldest first.
pub fn all_months(doc: &Document) -> Vec<MonthRow> {
    doc.months
        .iter()
        .map(|(k, m)| MonthRow {
            month: *k,
            totals: month_totals(m),
        })
        .collect()
}

pub fn year_report(doc: &Document, year: i32) -> YearReport {
    let months: Vec<MonthRow> = all_months(doc)
        .into_iter()
        .filter(|r| r.month.year() == year)
        .collect();

    let mut totals = MonthTotals::default();
    let mut best: Option<&MonthRow> = None;
    let mut worst: Option<&MonthRow> = None;
    for row in &months {
        totals.income += row.totals.income;
        totals.fixed += row.totals.fixed;
        totals.card += row.totals.card;
        totals.goals_saved += row.totals.goals_saved;
        totals.balance += row.totals.balance;
        // strict comparisons keep the earliest month on ties
        if best.is_none_or(|b| row.totals.balance > b.totals.balance) {
            best = Some(row);
        }
        if worst.is_none_or(|w| row.totals.balance < w.totals.balance) {
            worst = Some(row);
        }
    }

    let average_balance = if months.is_empty() {
        Decimal::ZERO
    } else {
        totals.balance / Decimal::from(months.len())
    };

    let largest_category = if months.is_empty() {
        None
    } else {
        let mut top = (ExpenseCategory::Fixed, totals.fixed);
        for candidate in [
            (ExpenseCategory::Card, totals.card),
            (ExpenseCategory::Goals, totals.goals_saved),
        ] {
            if candidate.1 > top.1 {
                top = candidate;
            }
        }
        Some(top)
    };

    YearReport {
        year,
        best_month: best.map(|r| r.month),
        worst_month: worst.map(|r| r.month),
        months,
        totals,
        average_balance,
        largest_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ym(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn installment(start: Option<&str>, parts: Option<u32>) -> Installment {
        Installment {
            id: "i".into(),
            name: "Phone".into(),
            month_value: Decimal::new(250, 0),
            total_parts: parts,
            start_ym: start.map(ym),
        }
    }

    #[test]
    fn eight_part_installment_lifecycle() {
        let it = installment(Some("2026-01"), Some(8));
        assert_eq!(it.end_month(), Some(ym("2026-08")));
        assert_eq!(it.remaining(ym("2026-01")), Some(8));
        assert_eq!(it.remaining(ym("2026-08")), Some(1));
        assert_eq!(it.remaining(ym("2026-09")), Some(0));
        assert_eq!(
            it.status(ym("2026-03")),
            InstallmentStatus::Active { remaining: 6, paid: 2 }
        );
        assert_eq!(it.status(ym("2027-01")), InstallmentStatus::Finished);
    }

    #[test]
    fn single_part_installment_starts_and_ends_together() {
        let it = installment(Some("2025-12"), Some(1));
        assert_eq!(it.end_month(), Some(ym("2025-12")));
        assert_eq!(it.remaining(ym("2025-12")), Some(1));
        assert_eq!(it.remaining(ym("2026-01")), Some(0));
    }

    #[test]
    fn reference_before_start_reports_not_started() {
        let it = installment(Some("2026-05"), Some(3));
        assert_eq!(
            it.status(ym("2026-02")),
            InstallmentStatus::NotStarted { starts: ym("2026-05") }
        );
        assert_eq!(it.remaining(ym("2026-02")), None);
    }

    #[test]
    fn missing_start_or_parts_is_unknown() {
        for it in [installment(None, Some(3)), installment(Some("2026-01"), None)] {
            assert_eq!(it.end_month(), None);
            assert_eq!(it.status(ym("2026-01")), InstallmentStatus::Unknown);
            assert_eq!(it.remaining(ym("2026-01")), None);
        }
    }

    #[test]
    fn inactive_subscriptions_do_not_count_toward_card_total() {
        let doc = Document::from_value(json!({ "months": { "2026-01": {
            "card": [{ "id": "a", "name": "TV", "monthValue": 100 }],
            "cardRecurring": [
                { "id": "b", "name": "Music", "value": 30, "active": true },
                { "id": "c", "name": "Video", "value": 20, "active": false }
            ]
        } } }));
        let m = doc.month(ym("2026-01")).unwrap();
        assert_eq!(total_card(m), Decimal::new(130, 0));
    }

    #[test]
    fn balance_is_income_minus_every_outflow() {
        let doc = Document::from_value(json!({ "months": { "2026-02": {
            "incomeBase": 3000.10,
            "incomeExtra": [{ "id": "x", "name": "Freelance", "value": 0.2 }],
            "fixed": [
                { "id": "f", "name": "Rent", "value": 1200.3, "dueDay": 5, "paid": true },
                { "id": "g", "name": "Power", "value": 0.1, "dueDay": 9 }
            ],
            "card": [{ "id": "c", "name": "TV", "monthValue": 99.99 }],
            "cardRecurring": [{ "id": "s", "name": "Music", "value": 19.9 }],
            "goals": [{ "id": "t", "name": "Trip", "target": 5000, "saved": 250.05 }]
        } } }));
        let m = doc.month(ym("2026-02")).unwrap();
        let t = month_totals(m);
        assert_eq!(t.income, Decimal::from_str_exact("3000.30").unwrap());
        assert_eq!(t.fixed, Decimal::from_str_exact("1200.40").unwrap());
        assert_eq!(t.card, Decimal::from_str_exact("119.89").unwrap());
        assert_eq!(t.balance, t.income - t.fixed - t.card - t.goals_saved);
        assert_eq!(t.balance, balance(m));
        assert_eq!(t.balance, Decimal::from_str_exact("1429.96").unwrap());
    }

    #[test]
    fn empty_year_has_zero_average_and_no_ranking() {
        let report = year_report(&Document::default(), 2026);
        assert!(report.months.is_empty());
        assert_eq!(report.average_balance, Decimal::ZERO);
        assert_eq!(report.best_month, None);
        assert_eq!(report.largest_category, None);
    }

    #[test]
    fn year_report_ranks_months_and_categories() {
        let doc = Document::from_value(json!({ "months": {
            "2026-03": { "incomeBase": 1000, "fixed": [{ "id": "a", "value": 500 }] },
            "2026-01": { "incomeBase": 1000, "card": [{ "id": "b", "monthValue": 300 }] },
            "2026-02": { "incomeBase": 1000, "goals": [{ "id": "c", "target": 1, "saved": 500 }] },
            "2025-12": { "incomeBase": 99999 }
        } }));
        let report = year_report(&doc, 2026);
        let keys: Vec<String> = report.months.iter().map(|r| r.month.to_string()).collect();
        assert_eq!(keys, ["2026-01", "2026-02", "2026-03"]);
        assert_eq!(report.totals.income, Decimal::new(3000, 0));
        assert_eq!(report.totals.balance, Decimal::new(1700, 0));
        assert_eq!(report.best_month, Some(ym("2026-01")));
        // February and March tie on balance; the earlier one wins
        assert_eq!(report.worst_month, Some(ym("2026-02")));
        assert_eq!(report.average_balance.round_dp(2), Decimal::from_str_exact("566.67").unwrap());
        // Fixed and Goals tie at 500; Fixed is declared first
        assert_eq!(
            report.largest_category,
            Some((ExpenseCategory::Fixed, Decimal::new(500, 0)))
        );
    }
}
