//! Serviceability: maximum borrowing under a stress-tested rate.
//!
//! `max_borrowing` is rate-agnostic and stateless; the borrowing-power
//! assessment calls it twice (buffered stress rate and actual rate) to
//! produce both a conservative and an actual maximum.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::as_decimal;
use crate::tax::{self, NetIncomeBreakdown, TaxTable};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Regulatory buffer added to the actual rate for the stressed assessment,
/// in percentage points.
pub const DEFAULT_BUFFER_PCT: Decimal = dec!(3.0);

/// Assumed monthly commitment per dollar of credit-card limit.
pub const CREDIT_CARD_COMMITMENT_RATE: Rate = dec!(0.03);

/// Fallback minimum monthly expense floor when the dependant table has no
/// entry for the requested count.
pub const DEFAULT_EXPENSE_FLOOR: Money = dec!(2000);

/// Dependant counts are clamped to this range before table lookup.
const MAX_DEPENDANTS: i64 = 6;

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Minimum monthly living-expense floor keyed by dependant count (0–6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFloorTable {
    pub floors: BTreeMap<String, Money>,
}

impl ExpenseFloorTable {
    /// Build from `{"minimum_monthly_expense_floor": {"0": 2000, ...}}` or
    /// a bare count-to-amount map. Unreadable entries are dropped; lookups
    /// for missing keys fall back to [`DEFAULT_EXPENSE_FLOOR`].
    pub fn from_value(raw: &Value) -> Self {
        let map = raw
            .get("minimum_monthly_expense_floor")
            .and_then(Value::as_object)
            .or_else(|| raw.as_object());

        let mut floors = BTreeMap::new();
        if let Some(map) = map {
            for (count, amount) in map {
                if let Some(amount) = as_decimal(amount) {
                    floors.insert(count.clone(), amount);
                }
            }
        }
        ExpenseFloorTable { floors }
    }

    /// Floor for a dependant count, clamped to 0–6.
    pub fn floor_for(&self, dependants: i64) -> Money {
        let key = dependants.clamp(0, MAX_DEPENDANTS).to_string();
        self.floors.get(&key).copied().unwrap_or(DEFAULT_EXPENSE_FLOOR)
    }
}

// ---------------------------------------------------------------------------
// Core calculation
// ---------------------------------------------------------------------------

/// Inputs to a single serviceability evaluation. Expense clamping against
/// net income is the caller's decision; this calculation only guards
/// capacity at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceabilityInput {
    pub net_monthly_income: Money,
    pub monthly_living_expenses: Money,
    pub other_monthly_debts: Money,
    pub credit_card_monthly_commitment: Money,
    /// Annual rate in percent, already including any stress buffer.
    pub stress_annual_rate_pct: Decimal,
    pub term_years: u32,
}

/// Monthly repayment capacity, floored at zero.
pub fn repayment_capacity(input: &ServiceabilityInput) -> Money {
    (input.net_monthly_income
        - input.monthly_living_expenses
        - input.other_monthly_debts
        - input.credit_card_monthly_commitment)
        .max(Decimal::ZERO)
}

/// Maximum borrowable principal via present-value-of-annuity inversion.
///
/// Zero capacity yields zero (a valid outcome, not an error). A
/// non-positive rate degenerates to `capacity * n`.
pub fn max_borrowing(input: &ServiceabilityInput) -> Money {
    let capacity = repayment_capacity(input);
    if capacity <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let periods = Decimal::from(input.term_years * 12);
    let rate = input.stress_annual_rate_pct / dec!(100) / dec!(12);
    if rate <= Decimal::ZERO {
        return capacity * periods;
    }

    let growth = (Decimal::ONE + rate).powu(u64::from(input.term_years) * 12);
    capacity * (Decimal::ONE - Decimal::ONE / growth) / rate
}

// ---------------------------------------------------------------------------
// Borrowing-power assessment
// ---------------------------------------------------------------------------

/// Policy toggles observed to vary between deployments: whether expenses
/// are clamped down to net income, the card-commitment rate, the stress
/// buffer, and whether the flat levy applies in the net-income derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceabilityPolicy {
    pub buffer_pct: Decimal,
    pub clamp_expenses_to_net_income: bool,
    pub credit_card_commitment_rate: Rate,
    pub include_levy: bool,
}

impl Default for ServiceabilityPolicy {
    fn default() -> Self {
        ServiceabilityPolicy {
            buffer_pct: DEFAULT_BUFFER_PCT,
            clamp_expenses_to_net_income: true,
            credit_card_commitment_rate: CREDIT_CARD_COMMITMENT_RATE,
            include_levy: false,
        }
    }
}

/// Raw user inputs for the borrowing-power assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowingPowerInput {
    pub gross_annual_income: Money,
    pub declared_monthly_expenses: Money,
    pub dependants: i64,
    pub other_monthly_debts: Money,
    pub credit_card_limits: Money,
    pub annual_rate_pct: Decimal,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowingPowerOutput {
    pub net_income: NetIncomeBreakdown,
    /// Expenses after the dependant floor and any net-income clamp.
    pub assessed_monthly_expenses: Money,
    pub credit_card_monthly_commitment: Money,
    pub max_borrowing_buffered: Money,
    pub max_borrowing_unbuffered: Money,
}

/// Derive net income, apply the dependant expense floor and (per policy)
/// the net-income clamp, then invert the annuity at the buffered and
/// unbuffered rates.
pub fn assess_borrowing_power(
    input: &BorrowingPowerInput,
    tax_table: &TaxTable,
    expense_floors: &ExpenseFloorTable,
    policy: &ServiceabilityPolicy,
) -> HomeLoanResult<ComputationOutput<BorrowingPowerOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let net_income = tax::net_income(tax_table, input.gross_annual_income, policy.include_levy);

    if expense_floors.floors.is_empty() {
        warnings.push(format!(
            "no expense-floor table; default minimum floor of {DEFAULT_EXPENSE_FLOOR} applied"
        ));
    }
    let floor = expense_floors.floor_for(input.dependants);
    let mut expenses = input.declared_monthly_expenses.max(floor);
    if expenses > input.declared_monthly_expenses {
        warnings.push(format!(
            "declared expenses below the minimum floor of {} for {} dependants; floor applied",
            floor, input.dependants
        ));
    }
    if policy.clamp_expenses_to_net_income
        && net_income.net_monthly > Decimal::ZERO
        && expenses > net_income.net_monthly
    {
        expenses = net_income.net_monthly;
        warnings.push("monthly expenses clamped to net monthly income".to_string());
    }

    let card_commitment = input.credit_card_limits * policy.credit_card_commitment_rate;

    let at_rate = |rate_pct: Decimal| {
        max_borrowing(&ServiceabilityInput {
            net_monthly_income: net_income.net_monthly,
            monthly_living_expenses: expenses,
            other_monthly_debts: input.other_monthly_debts,
            credit_card_monthly_commitment: card_commitment,
            stress_annual_rate_pct: rate_pct,
            term_years: input.term_years,
        })
    };
    let buffered = at_rate(input.annual_rate_pct + policy.buffer_pct);
    let unbuffered = at_rate(input.annual_rate_pct);

    if buffered <= Decimal::ZERO {
        warnings.push("no repayment capacity at the stressed rate".to_string());
    }

    Ok(with_metadata(
        "progressive_tax_net_income_annuity_inversion",
        policy,
        warnings,
        start.elapsed().as_micros() as u64,
        BorrowingPowerOutput {
            net_income,
            assessed_monthly_expenses: expenses,
            credit_card_monthly_commitment: card_commitment,
            max_borrowing_buffered: buffered,
            max_borrowing_unbuffered: unbuffered,
        },
    ))
}
