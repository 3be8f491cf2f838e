//! End-to-end affordability assessment: the composition the calculator
//! page runs on every input change. Net income, serviceability, LVR/LMI,
//! stamp duty, and headline repayments from one set of inputs and one set
//! of reference tables.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amortization::{monthly_io, monthly_pi};
use crate::lvr_lmi::{assess_lmi, LmiAssessment, LmiTable, LvrResult, LMI_LVR_THRESHOLD};
use crate::serviceability::{
    assess_borrowing_power, BorrowingPowerInput, BorrowingPowerOutput, ExpenseFloorTable,
    ServiceabilityPolicy,
};
use crate::stamp_duty::StampDutyEstimator;
use crate::tax::TaxTable;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HomeLoanResult;

/// The reference tables a calculation session needs. Income-tax brackets
/// are required; the others degrade to empty tables with a warning at
/// assessment time.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    pub tax: TaxTable,
    pub expense_floors: ExpenseFloorTable,
    pub lmi: LmiTable,
    pub stamp_duty: StampDutyEstimator,
}

impl ReferenceTables {
    /// Build the full set from externally loaded documents. Fails only on
    /// the tax brackets; a session cannot run without them.
    pub fn from_values(
        tax: &Value,
        expense_floors: &Value,
        lmi: &Value,
        stamp_duty: &Value,
    ) -> HomeLoanResult<Self> {
        Ok(ReferenceTables {
            tax: TaxTable::from_value(tax)?,
            expense_floors: ExpenseFloorTable::from_value(expense_floors),
            lmi: LmiTable::from_value(lmi),
            stamp_duty: StampDutyEstimator::from_value(stamp_duty),
        })
    }
}

/// User inputs for a full assessment: borrowing-power inputs plus the
/// property under consideration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    #[serde(flatten)]
    pub borrowing: BorrowingPowerInput,
    pub property_price: Money,
    pub deposit: Money,
    pub jurisdiction: String,
    /// Defaults to the LMI table's `capitalise_by_default` when absent.
    #[serde(default)]
    pub capitalise_lmi: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub borrowing: BorrowingPowerOutput,
    /// Monthly P&I repayment on the unbuffered maximum.
    pub monthly_repayment_pi: Money,
    /// Monthly interest-only repayment on the unbuffered maximum.
    pub monthly_repayment_io: Money,
    /// LVR before any premium capitalization.
    pub lvr: LvrResult,
    pub lmi: LmiAssessment,
    pub stamp_duty: Money,
}

/// One full pass over the engine. Idempotent and re-entrant: every call
/// rebuilds its result from scratch.
pub fn assess_affordability(
    input: &AffordabilityInput,
    tables: &ReferenceTables,
    policy: &ServiceabilityPolicy,
) -> HomeLoanResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();

    let borrowing =
        assess_borrowing_power(&input.borrowing, &tables.tax, &tables.expense_floors, policy)?;
    let mut warnings = borrowing.warnings;
    let borrowing = borrowing.result;

    let capitalise = input
        .capitalise_lmi
        .unwrap_or(tables.lmi.capitalise_by_default);
    let lmi = assess_lmi(input.property_price, input.deposit, &tables.lmi, capitalise);
    if tables.lmi.bands.is_empty() && lmi.base.ratio > LMI_LVR_THRESHOLD {
        warnings.push("no LMI premium table; premium not estimated".to_string());
    }

    let stamp_duty = tables
        .stamp_duty
        .duty(input.property_price, &input.jurisdiction);
    if input.property_price > Decimal::ZERO
        && !tables.stamp_duty.has_jurisdiction(&input.jurisdiction)
    {
        warnings.push(format!(
            "no stamp-duty table for jurisdiction '{}'; duty not computed",
            input.jurisdiction
        ));
    }

    let monthly_repayment_pi = monthly_pi(
        borrowing.max_borrowing_unbuffered,
        input.borrowing.annual_rate_pct,
        input.borrowing.term_years,
    );
    let monthly_repayment_io = monthly_io(
        borrowing.max_borrowing_unbuffered,
        input.borrowing.annual_rate_pct,
    );

    Ok(with_metadata(
        "affordability_composition",
        policy,
        warnings,
        start.elapsed().as_micros() as u64,
        AffordabilityOutput {
            borrowing,
            monthly_repayment_pi,
            monthly_repayment_io,
            lvr: lmi.base,
            lmi,
            stamp_duty,
        },
    ))
}
