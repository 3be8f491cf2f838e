//! Loan-to-value ratio and lenders'-mortgage-insurance estimation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::as_decimal;
use crate::types::{Money, Rate};

/// No insurance is required at or below this loan-to-value ratio.
pub const LMI_LVR_THRESHOLD: Decimal = dec!(0.80);

/// Loan amount and ratio for a price/deposit pair, optionally with an
/// insurance premium capitalized into the loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LvrResult {
    pub loan_amount: Money,
    pub ratio: Decimal,
}

/// `loan = max(0, price - deposit) + capitalized_insurance`; the ratio is
/// zero when the price or the loan is non-positive.
pub fn lvr(price: Money, deposit: Money, capitalized_insurance: Money) -> LvrResult {
    let loan_amount = (price - deposit).max(Decimal::ZERO) + capitalized_insurance;
    let ratio = if price <= Decimal::ZERO || loan_amount <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        loan_amount / price
    };
    LvrResult { loan_amount, ratio }
}

// ---------------------------------------------------------------------------
// Premium table
// ---------------------------------------------------------------------------

/// Premium rate for a loan-amount range within an LVR band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmiRateBand {
    pub min_loan: Money,
    /// Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loan: Option<Money>,
    pub rate: Rate,
}

/// LVR range carrying loan-amount sub-bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmiBand {
    pub min_lvr: Decimal,
    pub max_lvr: Decimal,
    pub rates: Vec<LmiRateBand>,
}

/// Insurer premium-rate table, with the product's default capitalization
/// election.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LmiTable {
    pub bands: Vec<LmiBand>,
    #[serde(default)]
    pub capitalise_by_default: bool,
}

impl LmiTable {
    /// Build from an external document. Malformed bands degrade to absent
    /// entries rather than errors; an empty table estimates every premium
    /// at zero.
    pub fn from_value(raw: &Value) -> Self {
        let bands = raw
            .get("bands")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_band).collect())
            .unwrap_or_default();
        let capitalise_by_default = raw
            .get("capitalise_by_default")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        LmiTable {
            bands,
            capitalise_by_default,
        }
    }
}

fn parse_band(raw: &Value) -> Option<LmiBand> {
    let min_lvr = raw.get("min_lvr").and_then(as_decimal)?;
    let max_lvr = raw.get("max_lvr").and_then(as_decimal)?;
    let rates = raw
        .get("rates")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_rate_band).collect())
        .unwrap_or_default();
    Some(LmiBand {
        min_lvr,
        max_lvr,
        rates,
    })
}

fn parse_rate_band(raw: &Value) -> Option<LmiRateBand> {
    Some(LmiRateBand {
        min_loan: raw.get("min_loan").and_then(as_decimal).unwrap_or(Decimal::ZERO),
        max_loan: raw.get("max_loan").and_then(as_decimal),
        rate: raw.get("rate").and_then(as_decimal)?,
    })
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Band-based premium: zero at or below the threshold ratio, otherwise
/// `loan * rate` from the matching ratio band and loan sub-band. No match
/// estimates zero.
pub fn estimate_premium(loan_amount: Money, ratio: Decimal, table: &LmiTable) -> Money {
    if ratio <= LMI_LVR_THRESHOLD {
        return Decimal::ZERO;
    }
    for band in &table.bands {
        if ratio >= band.min_lvr && ratio < band.max_lvr {
            for rate_band in &band.rates {
                let below_max = rate_band.max_loan.map_or(true, |max| loan_amount < max);
                if loan_amount >= rate_band.min_loan && below_max {
                    return loan_amount * rate_band.rate;
                }
            }
        }
    }
    Decimal::ZERO
}

/// LVR and premium, with at most one capitalization round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmiAssessment {
    /// LVR before any premium is folded into the loan.
    pub base: LvrResult,
    /// Premium on the base loan.
    pub base_premium: Money,
    pub capitalised: bool,
    /// Final LVR (equal to `base` unless capitalized).
    pub lvr: LvrResult,
    /// Final premium (re-evaluated once when capitalized).
    pub premium: Money,
}

/// Estimate the premium, and when `capitalise` is elected and the first
/// pass is non-zero, fold it into the loan and re-evaluate exactly once.
/// The second result is final even if it lands in a different ratio band.
pub fn assess_lmi(price: Money, deposit: Money, table: &LmiTable, capitalise: bool) -> LmiAssessment {
    let base = lvr(price, deposit, Decimal::ZERO);
    let base_premium = estimate_premium(base.loan_amount, base.ratio, table);

    if capitalise && base_premium > Decimal::ZERO {
        let capitalized = lvr(price, deposit, base_premium);
        let premium = estimate_premium(capitalized.loan_amount, capitalized.ratio, table);
        LmiAssessment {
            base,
            base_premium,
            capitalised: true,
            lvr: capitalized,
            premium,
        }
    } else {
        LmiAssessment {
            base,
            base_premium,
            capitalised: false,
            lvr: base,
            premium: base_premium,
        }
    }
}
