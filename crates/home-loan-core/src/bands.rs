//! Piecewise band lookup with accumulated base.
//!
//! One evaluator serves the three bracketed reference tables in the engine:
//! progressive income tax, stamp duty, and LMI premium rates. Consumers
//! differ only in how their tables are constructed and how the looked-up
//! amount combines with the principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// One band of a bracket table.
///
/// `upper == None` means unbounded. `base` is the accumulated amount at the
/// band's lower bound; `rate` is the marginal rate applied to the slice of
/// the value above `lower`. Fixed-amount bands are encoded as
/// `base = amount, rate = 0`.
///
/// Serde field names (`min` / `max` / `base` / `rate`) match one of the
/// shapes accepted by the normalizer, so a serialized canonical table
/// re-normalizes to itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(rename = "min")]
    pub lower: Money,
    #[serde(rename = "max", default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Money>,
    #[serde(default)]
    pub base: Money,
    #[serde(default)]
    pub rate: Rate,
}

impl Band {
    /// Whether `value` falls in this band's half-open range `(lower, upper]`.
    pub fn contains(&self, value: Money) -> bool {
        value > self.lower && self.upper.map_or(true, |u| value <= u)
    }
}

/// An ordered sequence of bands, sorted ascending by lower bound.
///
/// Gaps and overlaps are tolerated: lookup takes the first matching band,
/// and a value matching no band contributes zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketTable {
    pub bands: Vec<Band>,
}

impl BracketTable {
    /// Build a table, sorting bands ascending by lower bound.
    pub fn new(mut bands: Vec<Band>) -> Self {
        bands.sort_by(|a, b| a.lower.cmp(&b.lower));
        BracketTable { bands }
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Accumulated contribution for `value`: for the first band containing
    /// `value`, `base + (min(value, upper) - lower) * rate`, clamped
    /// non-negative. Non-positive values and unmatched values contribute 0.
    pub fn contribution(&self, value: Money) -> Money {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        for band in &self.bands {
            if band.contains(value) {
                let ceiling = band.upper.map_or(value, |u| value.min(u));
                let amount = band.base + (ceiling - band.lower) * band.rate;
                return amount.max(Decimal::ZERO);
            }
        }
        Decimal::ZERO
    }
}
