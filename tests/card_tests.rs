// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use monthbook::{
    app::App,
    cli,
    commands::card::{self, installment_views},
    db,
    ledger::{InstallmentStatus, total_card},
    month::MonthKey,
};
use rust_decimal::Decimal;

fn open() -> App {
    App::open(db::open_in_memory().unwrap()).unwrap()
}

fn run(app: &mut App, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["monthbook", "card"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("card", m)) => card::handle(app, m),
        _ => panic!("no card subcommand"),
    }
}

fn ym(s: &str) -> MonthKey {
    s.parse().unwrap()
}

#[test]
fn card_total_counts_installments_and_active_subscriptions_only() {
    let mut app = open();
    run(
        &mut app,
        &[
            "add", "--month", "2026-03", "--name", "Phone", "--value", "100", "--parts", "8",
            "--start", "2026-01",
        ],
    )
    .unwrap();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Music", "--value", "30"]).unwrap();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Video", "--value", "20"]).unwrap();

    let video = app.doc().month(ym("2026-03")).unwrap().card_recurring[1].id.clone();
    run(&mut app, &["sub", "toggle", "--month", "2026-03", "--id", &video]).unwrap();

    let record = app.doc().month(ym("2026-03")).unwrap();
    assert!(!record.card_recurring[1].active);
    assert_eq!(total_card(record), Decimal::new(130, 0));

    let phone = &record.card[0];
    assert_eq!(phone.end_month(), Some(ym("2026-08")));
    assert_eq!(
        phone.status(ym("2026-03")),
        InstallmentStatus::Active { remaining: 6, paid: 2 }
    );
}

#[test]
fn explicit_toggle_value_is_idempotent() {
    let mut app = open();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Cloud", "--value", "10"]).unwrap();
    let id = app.doc().month(ym("2026-03")).unwrap().card_recurring[0].id.clone();

    run(&mut app, &["sub", "toggle", "--month", "2026-03", "--id", &id, "--active", "yes"]).unwrap();
    run(&mut app, &["sub", "toggle", "--month", "2026-03", "--id", &id, "--active", "yes"]).unwrap();
    assert!(app.doc().month(ym("2026-03")).unwrap().card_recurring[0].active);

    assert!(run(&mut app, &["sub", "toggle", "--month", "2026-03", "--id", "missing"]).is_err());
}

#[test]
fn copy_prev_replaces_subscriptions_with_fresh_ids() {
    let mut app = open();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Music", "--value", "30"]).unwrap();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Video", "--value", "20"]).unwrap();
    let video = app.doc().month(ym("2026-03")).unwrap().card_recurring[1].id.clone();
    run(&mut app, &["sub", "toggle", "--month", "2026-03", "--id", &video, "--active", "no"]).unwrap();
    run(&mut app, &["sub", "add", "--month", "2026-04", "--name", "Old", "--value", "5"]).unwrap();

    run(&mut app, &["sub", "copy-prev", "--month", "2026-04"]).unwrap();

    let source = app.doc().month(ym("2026-03")).unwrap().card_recurring.clone();
    let copied = &app.doc().month(ym("2026-04")).unwrap().card_recurring;
    let names: Vec<&str> = copied.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Music", "Video"]);
    assert_eq!(copied[1].active, source[1].active);
    assert!(copied.iter().all(|c| source.iter().all(|s| s.id != c.id)));
}

#[test]
fn copy_prev_from_an_empty_month_fails_without_changes() {
    let mut app = open();
    run(&mut app, &["sub", "add", "--month", "2026-06", "--name", "Keep", "--value", "9"]).unwrap();
    let before = app.doc().clone();

    assert!(run(&mut app, &["sub", "copy-prev", "--month", "2026-06"]).is_err());
    assert_eq!(app.doc(), &before);
}

#[test]
fn invalid_installment_input_is_rejected() {
    let mut app = open();
    for args in [
        &["add", "--month", "2026-03", "--name", " ", "--value", "10"][..],
        &["add", "--month", "2026-03", "--name", "TV", "--value", "0"][..],
        &["add", "--month", "2026-03", "--name", "TV", "--value", "10", "--parts", "0"][..],
        &["add", "--month", "2026-03", "--name", "TV", "--value", "10", "--parts", "1000"][..],
        &["add", "--month", "2026-03", "--name", "TV", "--value", "10", "--start", "2026-13"][..],
    ] {
        assert!(run(&mut app, args).is_err(), "accepted {:?}", args);
    }
    assert!(app.doc().months.is_empty());
}

#[test]
fn installment_without_lifecycle_is_still_charged() {
    let mut app = open();
    run(&mut app, &["add", "--month", "2026-03", "--name", "Misc", "--value", "45.50"]).unwrap();
    let record = app.doc().month(ym("2026-03")).unwrap();
    assert_eq!(record.card[0].status(ym("2026-03")), InstallmentStatus::Unknown);
    assert_eq!(record.card[0].remaining(ym("2026-03")), None);
    assert_eq!(total_card(record), Decimal::from_str_exact("45.50").unwrap());

    let id = record.card[0].id.clone();
    run(&mut app, &["rm", "--month", "2026-03", "--id", &id]).unwrap();
    assert!(app.doc().month(ym("2026-03")).unwrap().card.is_empty());
}

fn seed_lifecycles(app: &mut App) {
    for args in [
        &["add", "--month", "2026-03", "--name", "Misc", "--value", "10"][..],
        &["add", "--month", "2026-03", "--name", "Sofa", "--value", "50", "--parts", "3", "--start", "2026-05"][..],
        &["add", "--month", "2026-03", "--name", "Phone", "--value", "100", "--parts", "8", "--start", "2026-01"][..],
        &["add", "--month", "2026-03", "--name", "Bike", "--value", "70", "--parts", "2", "--start", "2025-01"][..],
    ] {
        run(app, args).unwrap();
    }
}

#[test]
fn list_describes_each_installment_relative_to_the_month() {
    let mut app = open();
    seed_lifecycles(&mut app);
    let record = app.doc().month(ym("2026-03")).unwrap();
    let views = installment_views(record, ym("2026-03"));

    let statuses: Vec<InstallmentStatus> = views.iter().map(|v| v.status).collect();
    assert_eq!(
        statuses,
        vec![
            InstallmentStatus::Unknown,
            InstallmentStatus::NotStarted { starts: ym("2026-05") },
            InstallmentStatus::Active { remaining: 6, paid: 2 },
            InstallmentStatus::Finished,
        ]
    );
    let remaining: Vec<Option<u32>> = views.iter().map(|v| v.remaining_parts).collect();
    assert_eq!(remaining, vec![None, None, Some(6), Some(0)]);
    let ends: Vec<Option<MonthKey>> = views.iter().map(|v| v.end).collect();
    assert_eq!(ends, vec![None, Some(ym("2026-07")), Some(ym("2026-08")), Some(ym("2025-02"))]);

    run(&mut app, &["list", "--month", "2026-03"]).unwrap();
    run(&mut app, &["list", "--month", "2026-03", "--json"]).unwrap();
    run(&mut app, &["list", "--month", "2026-03", "--jsonl"]).unwrap();
    run(&mut app, &["list", "--month", "2027-01"]).unwrap();
}

#[test]
fn listed_installments_serialize_every_key_once() {
    let mut app = open();
    seed_lifecycles(&mut app);
    let record = app.doc().month(ym("2026-03")).unwrap();
    let views = installment_views(record, ym("2026-03"));

    for view in &views {
        let text = serde_json::to_string(view).unwrap();
        for key in [
            "id", "name", "monthValue", "totalParts", "startYm", "end", "remainingParts", "status",
            "remaining", "paid", "starts",
        ] {
            let hits = text.matches(&format!("\"{}\":", key)).count();
            assert!(hits <= 1, "{} appears {} times in {}", key, hits, text);
        }
    }

    let active: serde_json::Value = serde_json::to_value(&views[2]).unwrap();
    assert_eq!(active["status"], "active");
    assert_eq!(active["remaining"], 6);
    assert_eq!(active["remainingParts"], 6);
    assert_eq!(active["paid"], 2);
    assert_eq!(active["end"], "2026-08");

    let pending: serde_json::Value = serde_json::to_value(&views[1]).unwrap();
    assert_eq!(pending["status"], "not_started");
    assert_eq!(pending["starts"], "2026-05");
    assert!(pending["remainingParts"].is_null());
}

#[test]
fn subscription_list_renders_table_and_json() {
    let mut app = open();
    run(&mut app, &["sub", "add", "--month", "2026-03", "--name", "Music", "--value", "30"]).unwrap();
    run(&mut app, &["sub", "list", "--month", "2026-03"]).unwrap();
    run(&mut app, &["sub", "list", "--month", "2026-03", "--json"]).unwrap();
    run(&mut app, &["sub", "list", "--month", "2026-04"]).unwrap();
}
