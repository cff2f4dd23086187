// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::app::App;

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    if !app.has_remote() {
        bail!("No remote store configured or not signed in (see `config set-remote` and `session login`)");
    }
    match m.subcommand() {
        Some(("pull", _)) => {
            if app.pull()? {
                println!("Local ledger replaced with the remote copy");
            } else {
                println!("Remote has no ledger yet; local copy kept");
            }
        }
        Some(("push", _)) => {
            app.push_now()?;
            println!("Ledger uploaded");
        }
        _ => {}
    }
    Ok(())
}
