// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The persisted ledger document and its typed mutations.
//!
//! Documents written by older versions of the app are accepted as-is:
//! missing sequences become empty, non-numeric amounts become zero and the
//! legacy `income` field is folded into `incomeBase` by [`Document::normalize`].

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;
use crate::month::MonthKey;

pub type MonthMap = BTreeMap<MonthKey, MonthRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::months")]
    pub months: MonthMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub income_base: Decimal,
    /// Single income figure used before `incomeBase`/`incomeExtra` existed.
    #[serde(
        default,
        rename = "income",
        deserialize_with = "lenient::opt_decimal",
        skip_serializing
    )]
    legacy_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub income_extra: Vec<ExtraIncome>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub fixed: Vec<FixedExpense>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub card: Vec<Installment>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub card_recurring: Vec<Subscription>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraIncome {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient::day")]
    pub due_day: u32,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paid: bool,
}

/// A card purchase split over `total_parts` monthly charges starting at
/// `start_ym`. Either field may be unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub month_value: Decimal,
    #[serde(default, deserialize_with = "lenient::parts")]
    pub total_parts: Option<u32>,
    #[serde(default, deserialize_with = "lenient::month")]
    pub start_ym: Option<MonthKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub value: Decimal,
    #[serde(default = "active_by_default", deserialize_with = "lenient::flag_unless_false")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub target: Decimal,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "amount::serialize"
    )]
    pub saved: Decimal,
}

fn active_by_default() -> bool {
    true
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Entries addressed by their id inside a month.
pub trait Entry {
    const KIND: &'static str;
    fn id(&self) -> &str;
    fn id_mut(&mut self) -> &mut String;
}

macro_rules! impl_entry {
    ($ty:ty, $kind:literal) => {
        impl Entry for $ty {
            const KIND: &'static str = $kind;
            fn id(&self) -> &str {
                &self.id
            }
            fn id_mut(&mut self) -> &mut String {
                &mut self.id
            }
        }
    };
}

impl_entry!(ExtraIncome, "Extra income");
impl_entry!(FixedExpense, "Fixed expense");
impl_entry!(Installment, "Installment");
impl_entry!(Subscription, "Subscription");
impl_entry!(Goal, "Goal");

fn not_found<T: Entry>(key: MonthKey, id: &str) -> LedgerError {
    LedgerError::EntryNotFound {
        kind: T::KIND,
        id: id.to_string(),
        month: key.to_string(),
    }
}

fn find_mut<'a, T: Entry>(items: &'a mut [T], key: MonthKey, id: &str) -> Result<&'a mut T, LedgerError> {
    items
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| not_found::<T>(key, id))
}

fn remove_by_id<T: Entry>(items: &mut Vec<T>, key: MonthKey, id: &str) -> Result<T, LedgerError> {
    let pos = items
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| not_found::<T>(key, id))?;
    Ok(items.remove(pos))
}

/// Gives every entry a non-empty id that is unique within its sequence.
fn ensure_ids<T: Entry>(items: &mut [T]) -> usize {
    let mut seen = BTreeSet::new();
    let mut fixed = 0;
    for item in items.iter_mut() {
        if item.id().is_empty() || !seen.insert(item.id().to_string()) {
            *item.id_mut() = new_id();
            seen.insert(item.id().to_string());
            fixed += 1;
        }
    }
    fixed
}

impl MonthRecord {
    /// Applies the legacy-schema migration and repairs ids. Returns whether
    /// anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if let Some(income) = self.legacy_income.take() {
            if self.income_base.is_zero() {
                self.income_base = income;
            }
            changed = true;
        }
        let repaired = ensure_ids(&mut self.income_extra)
            + ensure_ids(&mut self.fixed)
            + ensure_ids(&mut self.card)
            + ensure_ids(&mut self.card_recurring)
            + ensure_ids(&mut self.goals);
        changed || repaired > 0
    }

    pub fn is_empty(&self) -> bool {
        self.income_base.is_zero()
            && self.income_extra.is_empty()
            && self.fixed.is_empty()
            && self.card.is_empty()
            && self.card_recurring.is_empty()
            && self.goals.is_empty()
    }
}

impl Document {
    /// Parses a stored document. Never fails: unreadable input yields an
    /// empty document.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(v),
            Err(err) => {
                tracing::warn!(error = %err, "stored ledger is not valid JSON; starting empty");
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            tracing::warn!("stored ledger is not a JSON object; starting empty");
            return Self::default();
        }
        let mut doc: Document = serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "stored ledger could not be read; starting empty");
            Document::default()
        });
        if doc.normalize() {
            tracing::debug!("ledger normalized from an older schema");
        }
        doc
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for record in self.months.values_mut() {
            changed |= record.normalize();
        }
        changed
    }

    pub fn month(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.months.get(&key)
    }

    pub fn ensure_month(&mut self, key: MonthKey) -> &mut MonthRecord {
        self.months.entry(key).or_default()
    }

    fn existing_month(&mut self, key: MonthKey) -> Result<&mut MonthRecord, LedgerError> {
        self.months
            .get_mut(&key)
            .ok_or_else(|| LedgerError::InvalidInput(format!("no record for {}", key)))
    }

    /// Month keys in chronological order.
    pub fn keys(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.months.keys().map(|k| k.year()).collect();
        years.into_iter().collect()
    }

    // income

    pub fn set_income_base(&mut self, key: MonthKey, amount: Decimal) {
        self.ensure_month(key).income_base = amount;
    }

    pub fn add_extra_income(&mut self, key: MonthKey, name: &str, value: Decimal) -> String {
        let id = new_id();
        self.ensure_month(key).income_extra.push(ExtraIncome {
            id: id.clone(),
            name: name.to_string(),
            value,
        });
        id
    }

    pub fn remove_extra_income(&mut self, key: MonthKey, id: &str) -> Result<ExtraIncome, LedgerError> {
        remove_by_id(&mut self.existing_month(key)?.income_extra, key, id)
    }

    // fixed bills

    pub fn add_fixed(&mut self, key: MonthKey, name: &str, value: Decimal, due_day: u32) -> String {
        let id = new_id();
        self.ensure_month(key).fixed.push(FixedExpense {
            id: id.clone(),
            name: name.to_string(),
            value,
            due_day,
            paid: false,
        });
        id
    }

    pub fn set_fixed_paid(&mut self, key: MonthKey, id: &str, paid: bool) -> Result<(), LedgerError> {
        find_mut(&mut self.existing_month(key)?.fixed, key, id)?.paid = paid;
        Ok(())
    }

    pub fn remove_fixed(&mut self, key: MonthKey, id: &str) -> Result<FixedExpense, LedgerError> {
        remove_by_id(&mut self.existing_month(key)?.fixed, key, id)
    }

    // card

    pub fn add_installment(
        &mut self,
        key: MonthKey,
        name: &str,
        month_value: Decimal,
        total_parts: Option<u32>,
        start_ym: Option<MonthKey>,
    ) -> String {
        let id = new_id();
        self.ensure_month(key).card.push(Installment {
            id: id.clone(),
            name: name.to_string(),
            month_value,
            total_parts,
            start_ym,
        });
        id
    }

    pub fn remove_installment(&mut self, key: MonthKey, id: &str) -> Result<Installment, LedgerError> {
        remove_by_id(&mut self.existing_month(key)?.card, key, id)
    }

    pub fn add_subscription(&mut self, key: MonthKey, name: &str, value: Decimal) -> String {
        let id = new_id();
        self.ensure_month(key).card_recurring.push(Subscription {
            id: id.clone(),
            name: name.to_string(),
            value,
            active: true,
        });
        id
    }

    pub fn set_subscription_active(
        &mut self,
        key: MonthKey,
        id: &str,
        active: bool,
    ) -> Result<(), LedgerError> {
        find_mut(&mut self.existing_month(key)?.card_recurring, key, id)?.active = active;
        Ok(())
    }

    pub fn remove_subscription(&mut self, key: MonthKey, id: &str) -> Result<Subscription, LedgerError> {
        remove_by_id(&mut self.existing_month(key)?.card_recurring, key, id)
    }

    /// Replaces `key`'s subscriptions with fresh copies of the previous
    /// month's. Copies get new ids and keep the source's active flag.
    pub fn copy_subscriptions_from_previous(&mut self, key: MonthKey) -> Result<usize, LedgerError> {
        let prev = key.previous().ok_or(LedgerError::MonthOutOfRange)?;
        let copies: Vec<Subscription> = self
            .months
            .get(&prev)
            .map(|m| m.card_recurring.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|s| Subscription {
                id: new_id(),
                name: s.name.clone(),
                value: s.value,
                active: s.active,
            })
            .collect();
        if copies.is_empty() {
            return Err(LedgerError::NothingToCopy(prev.to_string()));
        }
        let n = copies.len();
        self.ensure_month(key).card_recurring = copies;
        Ok(n)
    }

    // goals

    pub fn add_goal(&mut self, key: MonthKey, name: &str, target: Decimal, saved: Decimal) -> String {
        let id = new_id();
        self.ensure_month(key).goals.push(Goal {
            id: id.clone(),
            name: name.to_string(),
            target,
            saved,
        });
        id
    }

    pub fn set_goal_saved(&mut self, key: MonthKey, id: &str, saved: Decimal) -> Result<(), LedgerError> {
        find_mut(&mut self.existing_month(key)?.goals, key, id)?.saved = saved;
        Ok(())
    }

    pub fn remove_goal(&mut self, key: MonthKey, id: &str) -> Result<Goal, LedgerError> {
        remove_by_id(&mut self.existing_month(key)?.goals, key, id)
    }
}

/// Amounts are stored as plain JSON numbers.
mod amount {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match d.to_f64() {
            Some(f) => serializer.serialize_f64(f),
            None => serializer.collect_str(d),
        }
    }
}

/// Field readers that coerce instead of failing.
mod lenient {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use rust_decimal::prelude::FromPrimitive;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{MonthMap, MonthRecord};
    use crate::month::MonthKey;

    pub fn to_decimal(v: &Value) -> Option<Decimal> {
        match v {
            Value::Number(n) => {
                let s = n.to_string();
                Decimal::from_str(&s)
                    .or_else(|_| Decimal::from_scientific(&s))
                    .ok()
                    .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            }
            Value::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(to_decimal(&v).unwrap_or(Decimal::ZERO))
    }

    pub fn opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(to_decimal(&v))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }

    /// Only an explicit `false` turns the flag off.
    pub fn flag_unless_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(!matches!(Value::deserialize(d)?, Value::Bool(false)))
    }

    fn whole_number(v: &Value) -> Option<u64> {
        let n = to_decimal(v)?;
        if !n.fract().is_zero() || n.is_sign_negative() {
            return None;
        }
        rust_decimal::prelude::ToPrimitive::to_u64(&n)
    }

    pub fn day<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(whole_number(&v)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0))
    }

    pub fn parts<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(whole_number(&v)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0))
    }

    pub fn month<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MonthKey>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn months<'de, D: Deserializer<'de>>(d: D) -> Result<MonthMap, D::Error> {
        let mut out = MonthMap::new();
        if let Value::Object(map) = Value::deserialize(d)? {
            for (k, v) in map {
                let Ok(key) = k.trim().parse::<MonthKey>() else {
                    tracing::warn!(key = %k, "dropping ledger entry with an invalid month key");
                    continue;
                };
                let record = if v.is_object() {
                    serde_json::from_value::<MonthRecord>(v).unwrap_or_default()
                } else {
                    MonthRecord::default()
                };
                out.insert(key, record);
            }
        }
        Ok(out)
    }
}
