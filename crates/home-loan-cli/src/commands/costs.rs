use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use home_loan_core::lvr_lmi::{assess_lmi, LmiTable};
use home_loan_core::stamp_duty::StampDutyEstimator;
use home_loan_core::HomeLoanError;

use crate::input;

/// Negative money on the command line is a typo, not a scenario; reject it
/// before it reaches the engine's degrade-to-zero handling.
fn require_non_negative(value: Decimal, field: &str) -> Result<Decimal, HomeLoanError> {
    if value < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: field.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(value)
}

#[derive(Args)]
pub struct StampDutyArgs {
    /// Property price
    #[arg(long)]
    pub price: Decimal,

    /// Jurisdiction code (e.g. NSW)
    #[arg(long)]
    pub state: String,

    /// Per-jurisdiction stamp-duty bands
    #[arg(long)]
    pub duty_tables: String,
}

pub fn run_stamp_duty(args: StampDutyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let price = require_non_negative(args.price, "price")?;
    let raw = input::read_json_value(&args.duty_tables)?;
    let estimator = StampDutyEstimator::from_value(&raw);
    let duty = estimator.duty(price, &args.state);
    Ok(json!({
        "price": price,
        "jurisdiction": args.state,
        "stamp_duty": duty,
        "table_known": estimator.has_jurisdiction(&args.state),
    }))
}

#[derive(Args)]
pub struct LmiArgs {
    /// Property price
    #[arg(long)]
    pub price: Decimal,

    /// Deposit amount
    #[arg(long)]
    pub deposit: Decimal,

    /// LMI premium-rate bands
    #[arg(long)]
    pub lmi_table: String,

    /// Capitalize the premium into the loan (defaults to the table's flag)
    #[arg(long)]
    pub capitalise: Option<bool>,
}

pub fn run_lmi(args: LmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let price = require_non_negative(args.price, "price")?;
    let deposit = require_non_negative(args.deposit, "deposit")?;
    let table = LmiTable::from_value(&input::read_json_value(&args.lmi_table)?);
    let capitalise = args.capitalise.unwrap_or(table.capitalise_by_default);
    let assessment = assess_lmi(price, deposit, &table, capitalise);
    Ok(serde_json::to_value(assessment)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = require_non_negative(Decimal::from(-1), "price").unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidInput { .. }));
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_zero_and_positive_amounts_pass() {
        assert_eq!(
            require_non_negative(Decimal::ZERO, "deposit").unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            require_non_negative(Decimal::from(100), "price").unwrap(),
            Decimal::from(100)
        );
    }
}
