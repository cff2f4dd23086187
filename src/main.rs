// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use monthbook::{app::App, cli, commands, db, logging};

fn main() -> Result<()> {
    logging::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    // settings-only commands never touch the remote copy
    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
            return Ok(());
        }
        Some(("session", sub)) => return commands::session::handle(&conn, sub),
        Some(("config", sub)) => return commands::settings::handle(&conn, sub),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let mut app = App::connect(conn)?;
    let res = match matches.subcommand() {
        Some(("month", sub)) => commands::month::handle(&mut app, sub),
        Some(("fixed", sub)) => commands::fixed::handle(&mut app, sub),
        Some(("card", sub)) => commands::card::handle(&mut app, sub),
        Some(("goals", sub)) => commands::goals::handle(&mut app, sub),
        Some(("year", sub)) => commands::year::handle(&app, sub),
        Some(("export", sub)) => commands::exporter::handle(&app, sub),
        Some(("sync", sub)) => commands::sync::handle(&mut app, sub),
        Some(("doctor", _)) => commands::doctor::handle(&app),
        _ => Ok(()),
    };
    app.close();
    res
}
