use clap::Args;
use serde_json::Value;

use home_loan_core::amortization::{analyze_repayments, LoanParameters};
use home_loan_core::types::{snap_to_step, RATE_STEP_PCT};

use crate::input;

#[derive(Args)]
pub struct RepaymentsArgs {
    /// Loan parameters JSON (defaults to piped stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run(args: RepaymentsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut params: LoanParameters = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for a repayment analysis".into());
    };
    params.annual_rate_pct = snap_to_step(params.annual_rate_pct, RATE_STEP_PCT);

    let result = analyze_repayments(&params)?;
    Ok(serde_json::to_value(result)?)
}
