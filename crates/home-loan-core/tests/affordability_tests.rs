//! End-to-end assessment scenarios over realistic Australian reference
//! tables.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use home_loan_core::affordability::{assess_affordability, AffordabilityInput, ReferenceTables};
use home_loan_core::amortization::{amortize, LoanParameters};
use home_loan_core::serviceability::{BorrowingPowerInput, ServiceabilityPolicy};
use home_loan_core::types::{PaymentFrequency, RepaymentType};

fn tax_document() -> Value {
    json!({
        "brackets": [
            {"over": 0, "upTo": 18200, "rate": 0},
            {"over": 18200, "upTo": 45000, "rate": 0.16},
            {"over": 45000, "upTo": 135000, "base": 4288, "rate": 0.30},
            {"over": 135000, "upTo": 190000, "base": 31288, "rate": 0.37},
            {"over": 190000, "upTo": null, "base": 51638, "rate": 0.45}
        ]
    })
}

fn expense_floor_document() -> Value {
    json!({
        "minimum_monthly_expense_floor": {
            "0": 2100, "1": 2600, "2": 3100, "3": 3600, "4": 4100, "5": 4600, "6": 5100
        }
    })
}

fn lmi_document() -> Value {
    json!({
        "capitalise_by_default": true,
        "bands": [
            {"min_lvr": 0.80, "max_lvr": 0.85, "rates": [
                {"min_loan": 0, "max_loan": 500_000, "rate": 0.008},
                {"min_loan": 500_000, "rate": 0.012}
            ]},
            {"min_lvr": 0.85, "max_lvr": 0.90, "rates": [
                {"min_loan": 0, "max_loan": 500_000, "rate": 0.014},
                {"min_loan": 500_000, "rate": 0.019}
            ]},
            {"min_lvr": 0.90, "max_lvr": 0.95, "rates": [
                {"min_loan": 0, "rate": 0.025}
            ]}
        ]
    })
}

fn stamp_duty_document() -> Value {
    // Deliberately mixed shapes; the normalizer folds them together.
    json!({
        "jurisdictions": {
            "NSW": {"bands": [
                {"over": 0, "upTo": 17_000, "per_100": 1.25},
                {"over": 17_000, "upTo": 37_000, "base": 212.50, "per_100": 1.50},
                {"over": 37_000, "upTo": 99_000, "base": 512.50, "per_100": 1.75},
                {"over": 99_000, "upTo": 372_000, "base": 1_597.50, "per_100": 3.50},
                {"over": 372_000, "upTo": 1_240_000, "base": 11_152.50, "per_100": 4.50},
                {"over": 1_240_000, "base": 50_212.50, "per_100": 5.50}
            ]},
            "VIC": [
                {"min": 0, "max": 25_000, "percent": 1.4},
                {"min": 25_000, "max": 130_000, "base": 350, "percent": 2.4},
                {"min": 130_000, "max": 960_000, "base": 2_870, "percent": 6.0},
                {"min": 960_000, "base": 52_670, "rate": 0.055}
            ],
            "TAS": {"non_ppr_bands": [
                {"min": 0, "max": 3_000, "duty": 50},
                {"min": 3_000, "max": 25_000, "base": 50, "percent": 1.75},
                {"min": 25_000, "base": 435, "percent": 2.25}
            ]}
        }
    })
}

fn reference_tables() -> ReferenceTables {
    ReferenceTables::from_values(
        &tax_document(),
        &expense_floor_document(),
        &lmi_document(),
        &stamp_duty_document(),
    )
    .expect("tax brackets are well-formed")
}

fn standard_input() -> AffordabilityInput {
    AffordabilityInput {
        borrowing: BorrowingPowerInput {
            gross_annual_income: dec!(120_000),
            declared_monthly_expenses: dec!(2_500),
            dependants: 0,
            other_monthly_debts: dec!(0),
            credit_card_limits: dec!(0),
            annual_rate_pct: dec!(6.00),
            term_years: 30,
        },
        property_price: dec!(500_000),
        deposit: dec!(100_000),
        jurisdiction: "NSW".to_string(),
        capitalise_lmi: None,
    }
}

#[test]
fn test_buffered_maximum_is_strictly_below_unbuffered() {
    let out = assess_affordability(
        &standard_input(),
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    let borrowing = &out.result.borrowing;
    assert!(borrowing.max_borrowing_buffered > dec!(0));
    assert!(borrowing.max_borrowing_unbuffered > dec!(0));
    assert!(borrowing.max_borrowing_buffered < borrowing.max_borrowing_unbuffered);
}

#[test]
fn test_headline_repayments_follow_unbuffered_maximum() {
    let out = assess_affordability(
        &standard_input(),
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    let result = &out.result;
    assert!(result.monthly_repayment_pi > dec!(0));
    assert!(result.monthly_repayment_io > dec!(0));
    // At a positive rate over a finite term, P&I exceeds interest-only.
    assert!(result.monthly_repayment_pi > result.monthly_repayment_io);
}

#[test]
fn test_lvr_at_threshold_attracts_no_insurance() {
    // 500k price, 100k deposit: exactly 80% LVR.
    let out = assess_affordability(
        &standard_input(),
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert_eq!(out.result.lvr.loan_amount, dec!(400_000));
    assert_eq!(out.result.lvr.ratio, dec!(0.8));
    assert_eq!(out.result.lmi.premium, dec!(0));
}

#[test]
fn test_capitalization_round_trip_increases_loan_and_ratio() {
    let mut input = standard_input();
    input.deposit = dec!(60_000);
    // capitalise_lmi is None; the table's capitalise_by_default (true)
    // applies.
    let out = assess_affordability(
        &input,
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    let lmi = &out.result.lmi;
    assert!(lmi.capitalised);
    assert!(lmi.base_premium > dec!(0));
    assert!(lmi.lvr.loan_amount > lmi.base.loan_amount);
    assert!(lmi.lvr.ratio > lmi.base.ratio);
    // The second evaluation prices against the increased loan.
    assert!(lmi.premium > lmi.base_premium);
}

#[test]
fn test_explicit_capitalisation_opt_out_wins_over_table_default() {
    let mut input = standard_input();
    input.deposit = dec!(60_000);
    input.capitalise_lmi = Some(false);
    let out = assess_affordability(
        &input,
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert!(!out.result.lmi.capitalised);
    assert_eq!(out.result.lmi.premium, out.result.lmi.base_premium);
}

#[test]
fn test_nsw_duty_on_standard_purchase() {
    // 11,152.50 + (500,000 - 372,000) * 4.5%
    let out = assess_affordability(
        &standard_input(),
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert_eq!(out.result.stamp_duty, dec!(16_912.50));
}

#[test]
fn test_unknown_jurisdiction_degrades_with_warning() {
    let mut input = standard_input();
    input.jurisdiction = "ACT".to_string();
    let out = assess_affordability(
        &input,
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert_eq!(out.result.stamp_duty, dec!(0));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("no stamp-duty table")));
}

#[test]
fn test_mixed_table_shapes_all_evaluate() {
    let tables = reference_tables();
    // VIC arrived as a bare array with percent rates.
    let vic = tables.stamp_duty.duty(dec!(500_000), "VIC");
    assert_eq!(vic, dec!(25_070.000));
    // TAS arrived nested under non_ppr_bands with a fixed first band.
    assert_eq!(tables.stamp_duty.duty(dec!(2_000), "TAS"), dec!(50));
}

#[test]
fn test_missing_lmi_table_degrades_with_warning_above_threshold() {
    let tables = ReferenceTables::from_values(
        &tax_document(),
        &expense_floor_document(),
        &json!(null),
        &stamp_duty_document(),
    )
    .unwrap();

    // 60k deposit on 500k: 88% LVR, squarely in insurance territory.
    let mut input = standard_input();
    input.deposit = dec!(60_000);
    let out = assess_affordability(&input, &tables, &ServiceabilityPolicy::default()).unwrap();
    assert_eq!(out.result.lmi.premium, dec!(0));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("no LMI premium table")));

    // At 80% LVR no insurance is due, so the absent table is not worth a
    // warning.
    let out = assess_affordability(
        &standard_input(),
        &tables,
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert!(!out
        .warnings
        .iter()
        .any(|w| w.contains("no LMI premium table")));
}

#[test]
fn test_missing_tax_table_is_fatal() {
    let err = ReferenceTables::from_values(
        &json!({"brackets": []}),
        &expense_floor_document(),
        &lmi_document(),
        &stamp_duty_document(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("income_tax_brackets"));
}

#[test]
fn test_zero_capacity_household_is_a_valid_zero_outcome() {
    let mut input = standard_input();
    input.borrowing.gross_annual_income = dec!(15_000);
    input.borrowing.declared_monthly_expenses = dec!(4_000);
    let out = assess_affordability(
        &input,
        &reference_tables(),
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    assert_eq!(out.result.borrowing.max_borrowing_buffered, dec!(0));
    assert_eq!(out.result.monthly_repayment_pi, dec!(0));
}

#[test]
fn test_schedule_on_assessed_maximum_services_the_loan() {
    let tables = reference_tables();
    let out = assess_affordability(
        &standard_input(),
        &tables,
        &ServiceabilityPolicy::default(),
    )
    .unwrap();
    let schedule = amortize(&LoanParameters {
        principal: out.result.borrowing.max_borrowing_unbuffered,
        annual_rate_pct: dec!(6.00),
        term_years: 30,
        frequency: PaymentFrequency::Monthly,
        repayment_type: RepaymentType::PrincipalAndInterest,
        interest_only_years: 0,
        extra_per_period: dec!(0),
    });
    assert_eq!(schedule.records.len(), 360);
    let final_balance = schedule.records.last().unwrap().balance;
    assert!(final_balance < dec!(1), "loan not repaid: {final_balance}");
    // The level payment equals the monthly capacity the assessment used
    // (annuity inversion and annuity payment are inverses).
    let capacity = out.result.borrowing.net_income.net_monthly
        - out.result.borrowing.assessed_monthly_expenses;
    let diff = (schedule.first_period_payment - capacity).abs();
    assert!(diff < dec!(0.01), "payment {} != capacity {}", schedule.first_period_payment, capacity);
}

#[test]
fn test_assessment_is_deterministic() {
    let tables = reference_tables();
    let a = assess_affordability(&standard_input(), &tables, &ServiceabilityPolicy::default())
        .unwrap();
    let b = assess_affordability(&standard_input(), &tables, &ServiceabilityPolicy::default())
        .unwrap();
    assert_eq!(
        serde_json::to_value(&a.result).unwrap(),
        serde_json::to_value(&b.result).unwrap()
    );
}
