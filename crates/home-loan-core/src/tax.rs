//! Progressive income tax and net-income derivation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bands::BracketTable;
use crate::error::HomeLoanError;
use crate::normalize;
use crate::types::Money;
use crate::HomeLoanResult;

/// Flat levy applied on top of bracketed tax when enabled (Medicare levy).
pub const MEDICARE_LEVY_RATE: Decimal = dec!(0.02);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Progressive income-tax brackets in canonical band form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub brackets: BracketTable,
}

impl TaxTable {
    pub fn new(brackets: BracketTable) -> Self {
        TaxTable { brackets }
    }

    /// Build from an external document: `{"brackets": [...]}` or a bare
    /// band array. Income-tax brackets are a required table, so a document
    /// yielding no interpretable bands is a structural error.
    pub fn from_value(raw: &Value) -> HomeLoanResult<Self> {
        let source = raw.get("brackets").unwrap_or(raw);
        let brackets = normalize::normalize_bands(source);
        if brackets.is_empty() {
            return Err(HomeLoanError::MissingReferenceTable {
                name: "income_tax_brackets".into(),
                reason: "no bands could be interpreted".into(),
            });
        }
        Ok(TaxTable { brackets })
    }

    /// Annual tax on `annual_income`. Non-decreasing in income, zero at or
    /// below zero income.
    pub fn progressive_tax(&self, annual_income: Money) -> Money {
        self.brackets.contribution(annual_income)
    }
}

/// Derivation of net income from gross, itemised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetIncomeBreakdown {
    pub gross_annual: Money,
    pub income_tax: Money,
    pub levy: Money,
    pub net_annual: Money,
    pub net_monthly: Money,
}

/// Gross annual income to net annual/monthly income. The net figure is
/// floored at zero.
pub fn net_income(table: &TaxTable, gross_annual: Money, include_levy: bool) -> NetIncomeBreakdown {
    let gross = gross_annual.max(Decimal::ZERO);
    let income_tax = table.progressive_tax(gross);
    let levy = if include_levy {
        gross * MEDICARE_LEVY_RATE
    } else {
        Decimal::ZERO
    };
    let net_annual = (gross - income_tax - levy).max(Decimal::ZERO);
    NetIncomeBreakdown {
        gross_annual: gross,
        income_tax,
        levy,
        net_annual,
        net_monthly: net_annual / MONTHS_PER_YEAR,
    }
}
