// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "MONTHBOOK_LOG";
const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Installs the stderr subscriber. Filter directives come from
/// `MONTHBOOK_LOG`; anything unparseable falls back to `warn`.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
