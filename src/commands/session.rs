// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config;
use crate::utils::require_name;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let user = require_name(sub.get_one::<String>("user_id").unwrap(), "User id")?;
            let token = sub.get_one::<String>("token").unwrap();
            config::sign_in(conn, &user, token.trim())?;
            println!("Signed in as {}", user);
        }
        Some(("logout", _)) => {
            config::sign_out(conn)?;
            println!("Signed out");
        }
        Some(("status", _)) => match config::current_session(conn)? {
            Some(s) => println!("Signed in as {}", s.user_id),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
