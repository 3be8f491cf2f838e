//! Normalization of heterogeneous external reference tables.
//!
//! Reference data arrives in whatever shape the upstream document happens
//! to use: bands keyed directly by jurisdiction or nested under a
//! `jurisdictions`/`states` wrapper, bounds named `over`/`upTo` or
//! `min`/`max`, rates given as fractions, percentages, or currency per
//! $100. Everything is folded into the canonical [`Band`] shape here, once,
//! so the evaluators never see the variance. Normalization is idempotent:
//! a canonical table re-normalizes to itself.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::bands::{Band, BracketTable};
use crate::types::Money;

/// Keys under which a jurisdiction entry may nest its band array.
const BAND_LIST_KEYS: [&str; 4] = ["bands", "non_ppr_bands", "ppr_bands", "rates"];

/// Interpret a JSON value as a decimal. Accepts numbers and numeric
/// strings (canonical tables serialize Decimal as strings); anything else
/// is `None`.
pub(crate) fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First of `keys` present on `raw` with an interpretable numeric value.
fn decimal_field(raw: &Value, keys: &[&str]) -> Option<Money> {
    keys.iter().find_map(|k| raw.get(*k).and_then(as_decimal))
}

/// Normalize a single band object into the canonical shape.
///
/// Bounds come from `over`/`upTo` or `min`/`max` (missing lower bound is 0,
/// missing or null upper bound is unbounded). The rate resolves from
/// `rate` (fraction), then `percent` (0–100), then `per_100` (currency per
/// $100), defaulting to 0. A numeric `duty` field overrides the band to a
/// fixed amount: `base = duty, rate = 0`.
pub fn normalize_band(raw: &Value) -> Band {
    let lower = decimal_field(raw, &["over", "min"]).unwrap_or(Decimal::ZERO);
    let upper = decimal_field(raw, &["upTo", "max"]);

    if let Some(duty) = raw.get("duty").and_then(as_decimal) {
        return Band {
            lower,
            upper,
            base: duty,
            rate: Decimal::ZERO,
        };
    }

    let rate = decimal_field(raw, &["rate"])
        .or_else(|| decimal_field(raw, &["percent"]).map(|p| p / dec!(100)))
        .or_else(|| decimal_field(raw, &["per_100"]).map(|p| p / dec!(100)))
        .unwrap_or(Decimal::ZERO);
    let base = decimal_field(raw, &["base"]).unwrap_or(Decimal::ZERO);

    Band {
        lower,
        upper,
        base,
        rate,
    }
}

/// Normalize a band list: either a bare array, or an object carrying the
/// array under one of the conventional keys. Unrecognized shapes yield an
/// empty table, which evaluates to zero everywhere.
pub fn normalize_bands(raw: &Value) -> BracketTable {
    let list: &[Value] = match raw {
        Value::Array(items) => items,
        Value::Object(_) => BAND_LIST_KEYS
            .iter()
            .find_map(|k| raw.get(*k).and_then(Value::as_array))
            .map(|v| v.as_slice())
            .unwrap_or_default(),
        _ => &[],
    };
    BracketTable::new(list.iter().map(normalize_band).collect())
}

/// Normalize a jurisdiction-keyed document into canonical per-jurisdiction
/// tables, sorted ascending by lower bound within each jurisdiction.
pub fn normalize_jurisdiction_tables(raw: &Value) -> BTreeMap<String, BracketTable> {
    let by_jurisdiction = raw
        .get("jurisdictions")
        .and_then(Value::as_object)
        .or_else(|| raw.get("states").and_then(Value::as_object))
        .or_else(|| raw.as_object());

    let mut out = BTreeMap::new();
    if let Some(map) = by_jurisdiction {
        for (jurisdiction, entry) in map {
            out.insert(jurisdiction.clone(), normalize_bands(entry));
        }
    }
    out
}
