// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthbook::{
    app::App,
    cli,
    commands::{doctor, year},
    db,
    ledger::{ExpenseCategory, year_report},
    month::MonthKey,
};
use rust_decimal::Decimal;

fn ym(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

fn seeded_app() -> App {
    let mut app = App::open(db::open_in_memory().unwrap()).unwrap();
    app.update(|d| {
        d.set_income_base(ym(2025, 1), Decimal::new(3000, 0));
        d.add_fixed(ym(2025, 1), "Rent", Decimal::new(1000, 0), 1);
        d.set_income_base(ym(2025, 2), Decimal::new(3000, 0));
        d.add_installment(ym(2025, 2), "Laptop", Decimal::new(2500, 0), Some(3), Some(ym(2025, 1)));
        d.set_income_base(ym(2025, 3), Decimal::new(4000, 0));
        d.add_goal(ym(2025, 3), "Fund", Decimal::new(5000, 0), Decimal::new(1000, 0));
        d.set_income_base(ym(2024, 12), Decimal::new(1, 0));
        Ok(())
    })
    .unwrap();
    app
}

fn run_year(app: &App, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthbook", "year"];
    argv.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(argv);
    match m.subcommand() {
        Some(("year", sub)) => year::handle(app, sub),
        _ => panic!("no year subcommand"),
    }
}

#[test]
fn yearly_report_ranks_months_and_picks_the_largest_category() {
    let app = seeded_app();
    let report = year_report(app.doc(), 2025);

    assert_eq!(report.months.len(), 3);
    assert_eq!(report.totals.income, Decimal::new(10000, 0));
    assert_eq!(report.totals.balance, Decimal::new(5500, 0));
    assert_eq!(report.best_month, Some(ym(2025, 3)));
    assert_eq!(report.worst_month, Some(ym(2025, 2)));
    assert_eq!(
        report.largest_category,
        Some((ExpenseCategory::Card, Decimal::new(2500, 0)))
    );
    assert_eq!(
        report.average_balance.round_dp(2),
        Decimal::from_str_exact("1833.33").unwrap()
    );

    run_year(&app, &["--year", "2025"]).unwrap();
    run_year(&app, &["--year", "2025", "--json"]).unwrap();
    run_year(&app, &["--jsonl"]).unwrap();
}

#[test]
fn empty_year_has_zero_average_and_no_rankings() {
    let app = seeded_app();
    let report = year_report(app.doc(), 2030);
    assert!(report.months.is_empty());
    assert!(report.average_balance.is_zero());
    assert_eq!(report.best_month, None);
    assert_eq!(report.largest_category, None);
    run_year(&app, &["--year", "2030"]).unwrap();
}

#[test]
fn doctor_runs_against_the_stored_ledger() {
    let app = seeded_app();
    doctor::handle(&app).unwrap();
    let raw = db::load_raw_document(app.conn()).unwrap();
    assert!(doctor::diagnose(app.doc(), raw.as_deref()).is_empty());
}
