// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by ledger mutations and input parsing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Month arithmetic left the supported range (0000-01..9999-12)")]
    MonthOutOfRange,
    #[error("{kind} '{id}' not found in {month}")]
    EntryNotFound {
        kind: &'static str,
        id: String,
        month: String,
    },
    #[error("No subscriptions found in {0}")]
    NothingToCopy(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
