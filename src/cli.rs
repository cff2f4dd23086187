// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn month() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the selected month)")
}

fn id() -> Arg {
    Arg::new("id").long("id").required(true).help("Entry id")
}

fn name() -> Arg {
    Arg::new("name").long("name").required(true)
}

fn value() -> Arg {
    Arg::new("value").long("value").required(true)
}

fn json() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON")
}

fn jsonl() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .conflicts_with("json")
        .help("Print JSON lines")
}

pub fn build_cli() -> Command {
    Command::new("monthbook")
        .about("Monthly income, bills, card installments and savings goals")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the local store"))
        .subcommand(
            Command::new("month")
                .about("Monthly dashboard and income")
                .subcommand(
                    Command::new("show")
                        .about("Totals for one month and a summary of every month")
                        .arg(month())
                        .arg(json()),
                )
                .subcommand(
                    Command::new("select")
                        .about("Remember a month for later commands")
                        .arg(month().required(true)),
                )
                .subcommand(
                    Command::new("income")
                        .about("Set the base income")
                        .arg(month())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("extra")
                        .about("Extra income entries")
                        .subcommand(Command::new("add").arg(month()).arg(name()).arg(value()))
                        .subcommand(Command::new("list").arg(month()).arg(json()).arg(jsonl()))
                        .subcommand(Command::new("rm").arg(month()).arg(id())),
                ),
        )
        .subcommand(
            Command::new("fixed")
                .about("Fixed monthly bills")
                .subcommand(
                    Command::new("add")
                        .arg(month())
                        .arg(name())
                        .arg(value())
                        .arg(Arg::new("due_day").long("due-day").required(true)),
                )
                .subcommand(Command::new("list").arg(month()).arg(json()).arg(jsonl()))
                .subcommand(
                    Command::new("paid")
                        .about("Mark a bill paid or unpaid")
                        .arg(month())
                        .arg(id())
                        .arg(
                            Arg::new("paid")
                                .long("paid")
                                .default_value("yes")
                                .help("yes|no"),
                        ),
                )
                .subcommand(Command::new("rm").arg(month()).arg(id())),
        )
        .subcommand(
            Command::new("card")
                .about("Credit card installments and subscriptions")
                .subcommand(
                    Command::new("add")
                        .about("Add an installment purchase")
                        .arg(month())
                        .arg(name())
                        .arg(value().help("Amount charged each month"))
                        .arg(Arg::new("parts").long("parts").help("Number of monthly parts"))
                        .arg(Arg::new("start").long("start").help("First charged month, YYYY-MM")),
                )
                .subcommand(Command::new("list").arg(month()).arg(json()).arg(jsonl()))
                .subcommand(Command::new("rm").arg(month()).arg(id()))
                .subcommand(
                    Command::new("sub")
                        .about("Recurring subscriptions")
                        .subcommand(Command::new("add").arg(month()).arg(name()).arg(value()))
                        .subcommand(Command::new("list").arg(month()).arg(json()).arg(jsonl()))
                        .subcommand(
                            Command::new("toggle")
                                .arg(month())
                                .arg(id())
                                .arg(Arg::new("active").long("active").help("yes|no; flips when omitted")),
                        )
                        .subcommand(Command::new("rm").arg(month()).arg(id()))
                        .subcommand(
                            Command::new("copy-prev")
                                .about("Replace this month's subscriptions with the previous month's")
                                .arg(month()),
                        ),
                ),
        )
        .subcommand(
            Command::new("goals")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(month())
                        .arg(name())
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("saved").long("saved")),
                )
                .subcommand(Command::new("list").arg(month()).arg(json()).arg(jsonl()))
                .subcommand(
                    Command::new("saved")
                        .about("Set the amount saved toward a goal")
                        .arg(month())
                        .arg(id())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("rm").arg(month()).arg(id())),
        )
        .subcommand(
            Command::new("year")
                .about("Yearly report")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(json())
                .arg(jsonl()),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("sync")
                .about("Remote copy")
                .subcommand(Command::new("pull").about("Replace the local ledger with the remote one"))
                .subcommand(Command::new("push").about("Upload the local ledger now")),
        )
        .subcommand(
            Command::new("session")
                .about("Sign in and out")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("user_id").long("user-id").required(true))
                        .arg(Arg::new("token").long("token").default_value("")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show").arg(json()))
                .subcommand(
                    Command::new("set-currency")
                        .arg(Arg::new("currency").long("currency").required(true)),
                )
                .subcommand(
                    Command::new("set-remote")
                        .arg(Arg::new("url").long("url").required(true))
                        .arg(Arg::new("api_key").long("api-key").required(true))
                        .arg(Arg::new("table").long("table")),
                )
                .subcommand(
                    Command::new("set-debounce").arg(
                        Arg::new("ms")
                            .long("ms")
                            .required(true)
                            .value_parser(value_parser!(u64)),
                    ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistent entries"))
}
