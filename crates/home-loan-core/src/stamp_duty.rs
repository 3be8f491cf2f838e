//! Jurisdiction-keyed stamp-duty estimation.
//!
//! Duty comes from bracket evaluation over the jurisdiction's normalized
//! bands, or from an explicitly configured override strategy. An unknown
//! jurisdiction or missing table estimates zero duty; the figure degrades
//! to "not computed" rather than failing.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::bands::BracketTable;
use crate::normalize::normalize_jurisdiction_tables;
use crate::types::Money;

/// Custom duty strategy: price and jurisdiction code to a duty amount.
pub type DutyFn = dyn Fn(Money, &str) -> Money + Send + Sync;

/// How duty is computed: bracket lookup over the reference tables, or a
/// caller-supplied function configured at construction time.
pub enum DutyPolicy {
    TableLookup,
    Custom(Box<DutyFn>),
}

impl fmt::Debug for DutyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DutyPolicy::TableLookup => f.write_str("TableLookup"),
            DutyPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for DutyPolicy {
    fn default() -> Self {
        DutyPolicy::TableLookup
    }
}

/// Stamp-duty estimator over normalized per-jurisdiction bracket tables.
#[derive(Debug, Default)]
pub struct StampDutyEstimator {
    tables: BTreeMap<String, BracketTable>,
    policy: DutyPolicy,
}

impl StampDutyEstimator {
    pub fn new(tables: BTreeMap<String, BracketTable>) -> Self {
        StampDutyEstimator {
            tables,
            policy: DutyPolicy::TableLookup,
        }
    }

    /// Build from an external document in any of the normalizer's accepted
    /// shapes.
    pub fn from_value(raw: &Value) -> Self {
        Self::new(normalize_jurisdiction_tables(raw))
    }

    /// Replace the lookup strategy with a custom duty function.
    pub fn with_custom(mut self, f: Box<DutyFn>) -> Self {
        self.policy = DutyPolicy::Custom(f);
        self
    }

    pub fn has_jurisdiction(&self, jurisdiction: &str) -> bool {
        self.tables
            .get(jurisdiction)
            .map_or(false, |t| !t.is_empty())
    }

    pub fn jurisdictions(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// One-off duty for a purchase at `price` in `jurisdiction`, clamped
    /// non-negative. Unknown jurisdictions estimate zero.
    pub fn duty(&self, price: Money, jurisdiction: &str) -> Money {
        let duty = match &self.policy {
            DutyPolicy::Custom(f) => f(price, jurisdiction),
            DutyPolicy::TableLookup => self
                .tables
                .get(jurisdiction)
                .map_or(Decimal::ZERO, |table| table.contribution(price)),
        };
        duty.max(Decimal::ZERO)
    }
}
