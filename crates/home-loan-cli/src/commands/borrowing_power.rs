use clap::Args;
use serde_json::Value;

use home_loan_core::affordability::{assess_affordability, AffordabilityInput, ReferenceTables};
use home_loan_core::serviceability::ServiceabilityPolicy;
use home_loan_core::types::{snap_to_step, RATE_STEP_PCT};

use crate::input;

#[derive(Args)]
pub struct BorrowingPowerArgs {
    /// Scenario JSON (defaults to piped stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Progressive income-tax brackets (required for every session)
    #[arg(long)]
    pub tax_table: String,

    /// Dependant-count minimum-expense floors
    #[arg(long)]
    pub expense_floors: Option<String>,

    /// LMI premium-rate bands
    #[arg(long)]
    pub lmi_table: Option<String>,

    /// Per-jurisdiction stamp-duty bands
    #[arg(long)]
    pub duty_tables: Option<String>,

    /// Do not clamp declared expenses down to net monthly income
    #[arg(long)]
    pub no_expense_clamp: bool,

    /// Apply the flat levy in the net-income derivation
    #[arg(long)]
    pub include_levy: bool,
}

pub fn run(args: BorrowingPowerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut scenario: AffordabilityInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for a borrowing-power assessment".into());
    };
    scenario.borrowing.annual_rate_pct =
        snap_to_step(scenario.borrowing.annual_rate_pct, RATE_STEP_PCT);

    let tax = input::read_json_value(&args.tax_table)?;
    let expense_floors = read_optional(&args.expense_floors)?;
    let lmi = read_optional(&args.lmi_table)?;
    let duty = read_optional(&args.duty_tables)?;
    let tables = ReferenceTables::from_values(&tax, &expense_floors, &lmi, &duty)?;

    let policy = ServiceabilityPolicy {
        clamp_expenses_to_net_income: !args.no_expense_clamp,
        include_levy: args.include_levy,
        ..Default::default()
    };

    let result = assess_affordability(&scenario, &tables, &policy)?;
    Ok(serde_json::to_value(result)?)
}

/// Absent optional tables become null, which the engine treats as an
/// empty table (zero estimates, surfaced as warnings).
fn read_optional(path: &Option<String>) -> Result<Value, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::read_json_value(p),
        None => Ok(Value::Null),
    }
}
