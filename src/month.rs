// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar month keys (`YYYY-MM`) and the linear month index used for
//! all month arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("static month pattern"));

const MIN_INDEX: i64 = 0;
const MAX_INDEX: i64 = 9999 * 12 + 11;

/// A calendar month. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::from_date(today).unwrap_or(Self { year: 1970, month: 1 })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `year * 12 + (month - 1)`.
    pub fn to_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    /// Inverse of [`MonthKey::to_index`]. Uses floor division so negative
    /// intermediate indices never produce month 0.
    pub fn from_index(index: i64) -> Option<Self> {
        if !(MIN_INDEX..=MAX_INDEX).contains(&index) {
            return None;
        }
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    pub fn add_months(&self, n: i64) -> Option<Self> {
        Self::from_index(self.to_index().checked_add(n)?)
    }

    pub fn previous(&self) -> Option<Self> {
        self.add_months(-1)
    }

    pub fn next(&self) -> Option<Self> {
        self.add_months(1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        other.to_index() - self.to_index()
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Long label, e.g. `March 2026`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

/// Gregorian days in a month, taken as the day before the first of the
/// following month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (ny, nm) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?;
    Some(last.day())
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = MONTH_RE
            .captures(s)
            .ok_or_else(|| LedgerError::InvalidMonth(s.to_string()))?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
        MonthKey::new(year, month).ok_or_else(|| LedgerError::InvalidMonth(s.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn index_round_trips_across_supported_range() {
        for i in (MIN_INDEX..=MAX_INDEX).step_by(7) {
            assert_eq!(MonthKey::from_index(i).unwrap().to_index(), i);
        }
        assert_eq!(MonthKey::from_index(MAX_INDEX).unwrap().to_string(), "9999-12");
        assert!(MonthKey::from_index(-1).is_none());
        assert!(MonthKey::from_index(MAX_INDEX + 1).is_none());
    }

    #[test]
    fn add_months_rolls_over_years_both_ways() {
        assert_eq!(ym("2025-12").add_months(1).unwrap(), ym("2026-01"));
        assert_eq!(ym("2026-01").add_months(-1).unwrap(), ym("2025-12"));
        assert_eq!(ym("2026-03").add_months(-15).unwrap(), ym("2024-12"));
        assert_eq!(ym("2026-01").add_months(-25).unwrap(), ym("2023-12"));
        assert_eq!(ym("0000-01").add_months(-1), None);
        for n in [-40, -13, -12, -1, 0, 1, 11, 12, 29] {
            let k = ym("2026-05");
            assert_eq!(k.add_months(n).unwrap().add_months(-n).unwrap(), k);
        }
    }

    #[test]
    fn february_length_follows_leap_years() {
        for y in [1900, 2000, 2023, 2024, 2100, 2400] {
            let leap = (y % 4 == 0 && y % 100 != 0) || y % 400 == 0;
            assert_eq!(days_in_month(y, 2), Some(if leap { 29 } else { 28 }));
        }
        assert_eq!(days_in_month(2026, 4), Some(30));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        assert!("2026-1".parse::<MonthKey>().is_err());
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("2026-00".parse::<MonthKey>().is_err());
        assert!("26-01".parse::<MonthKey>().is_err());
        assert_eq!(ym("2026-07").to_string(), "2026-07");
    }

    #[test]
    fn ordering_matches_canonical_string_order() {
        let mut keys = vec![ym("2026-10"), ym("2025-12"), ym("2026-02")];
        keys.sort();
        let strings: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let mut sorted = strings.clone();
        sorted.sort();
        assert_eq!(strings, sorted);
    }
}
