//! Amortization schedules: P&I, interest-only, and interest-only
//! introductions, with optional extra periodic payments.
//!
//! The fixed P&I payment is derived once from the annuity-payment formula
//! over the full term and held constant, including after an interest-only
//! introduction ends. That under-amortizes the remaining principal over the
//! shorter true P&I window; the behavior is carried over deliberately from
//! the product it reimplements and is pinned by a test.

use std::time::Instant;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{
    with_metadata, ComputationOutput, Money, PaymentFrequency, Rate, RepaymentType,
};
use crate::HomeLoanResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Immutable input to the amortization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    /// Annual rate in percent (e.g., 6.00).
    pub annual_rate_pct: Decimal,
    pub term_years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub repayment_type: RepaymentType,
    /// Length of the interest-only introduction; only meaningful when
    /// `repayment_type` is `interest_only`.
    #[serde(default)]
    pub interest_only_years: u32,
    #[serde(default)]
    pub extra_per_period: Money,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One period of the schedule. The balance is floored at zero; the
/// principal portion is recorded before that floor is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub period: u32,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
    pub payment: Money,
}

/// Full schedule with aggregates. May terminate before the configured term
/// when extra payments drive the balance to zero early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub records: Vec<PaymentRecord>,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Headline per-repayment figure: the first record's payment.
    pub first_period_payment: Money,
}

/// Interest-cost comparison between pure P&I and interest-only strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub pi_total_interest: Money,
    pub io_total_interest: Money,
    /// Positive when interest-only costs more.
    pub interest_delta: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentAnalysis {
    pub schedule: Schedule,
    pub periods: u32,
    pub final_balance: Money,
    pub comparison: StrategyComparison,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Level payment for an amortizing loan: the standard annuity-payment
/// formula, or straight-line `principal / periods` at zero rate.
pub fn payment_per_period(principal: Money, rate_per_period: Rate, total_periods: u32) -> Money {
    if total_periods == 0 {
        return Decimal::ZERO;
    }
    if rate_per_period == Decimal::ZERO {
        return principal / Decimal::from(total_periods);
    }
    let growth = (Decimal::ONE + rate_per_period).powu(u64::from(total_periods));
    principal * rate_per_period * growth / (growth - Decimal::ONE)
}

/// Monthly P&I repayment on `amount` over `years`.
pub fn monthly_pi(amount: Money, annual_rate_pct: Decimal, years: u32) -> Money {
    payment_per_period(
        amount,
        annual_rate_pct / dec!(100) / dec!(12),
        years * MONTHS_PER_YEAR,
    )
}

/// Monthly interest-only repayment on `amount`.
pub fn monthly_io(amount: Money, annual_rate_pct: Decimal) -> Money {
    amount * annual_rate_pct / dec!(100) / dec!(12)
}

/// Step the schedule one period at a time until term end or payoff.
pub fn amortize(params: &LoanParameters) -> Schedule {
    let periods_per_year = params.frequency.periods_per_year();
    let total_periods = params.term_years * periods_per_year;
    let rate_per_period = params.annual_rate_pct / dec!(100) / Decimal::from(periods_per_year);

    // Held constant across the P&I phase, even after an interest-only
    // introduction (full-term derivation, see module docs).
    let fixed_payment = payment_per_period(params.principal, rate_per_period, total_periods);

    let mut io_remaining = match params.repayment_type {
        RepaymentType::InterestOnly => params.interest_only_years * periods_per_year,
        RepaymentType::PrincipalAndInterest => 0,
    };

    let mut balance = params.principal;
    let mut records = Vec::new();
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=total_periods {
        let interest = balance * rate_per_period;
        let (payment, principal_portion) = if io_remaining > 0 {
            io_remaining -= 1;
            let payment = interest + params.extra_per_period;
            (payment, (payment - interest).max(Decimal::ZERO))
        } else {
            let payment = fixed_payment + params.extra_per_period;
            (payment, payment - interest)
        };

        balance = (balance - principal_portion).max(Decimal::ZERO);
        total_paid += payment;
        total_interest += interest;
        records.push(PaymentRecord {
            period,
            interest,
            principal: principal_portion,
            balance,
            payment,
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    let first_period_payment = records.first().map_or(Decimal::ZERO, |r| r.payment);
    Schedule {
        records,
        total_paid,
        total_interest,
        first_period_payment,
    }
}

/// Interest-cost delta between forcing pure P&I and forcing interest-only,
/// both without extra payments. A caller-level composition over two engine
/// runs; the interest-only run keeps the configured introduction length,
/// capped at the term.
pub fn compare_repayment_strategies(params: &LoanParameters) -> StrategyComparison {
    let pi = amortize(&LoanParameters {
        repayment_type: RepaymentType::PrincipalAndInterest,
        interest_only_years: 0,
        extra_per_period: Decimal::ZERO,
        ..params.clone()
    });
    let io = amortize(&LoanParameters {
        repayment_type: RepaymentType::InterestOnly,
        interest_only_years: params.interest_only_years.min(params.term_years),
        extra_per_period: Decimal::ZERO,
        ..params.clone()
    });
    StrategyComparison {
        pi_total_interest: pi.total_interest,
        io_total_interest: io.total_interest,
        interest_delta: io.total_interest - pi.total_interest,
    }
}

/// Schedule plus strategy comparison in the standard output envelope.
pub fn analyze_repayments(
    params: &LoanParameters,
) -> HomeLoanResult<ComputationOutput<RepaymentAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if params.principal <= Decimal::ZERO {
        warnings.push("non-positive principal produces an empty estimate".to_string());
    }
    if params.term_years == 0 {
        warnings.push("zero-year term produces an empty schedule".to_string());
    }

    let schedule = amortize(params);
    let comparison = compare_repayment_strategies(params);
    let periods = schedule.records.len() as u32;
    let final_balance = schedule.records.last().map_or(params.principal.max(Decimal::ZERO), |r| r.balance);

    Ok(with_metadata(
        "level_payment_amortization",
        params,
        warnings,
        start.elapsed().as_micros() as u64,
        RepaymentAnalysis {
            schedule,
            periods,
            final_balance,
            comparison,
        },
    ))
}
