mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::borrowing_power::BorrowingPowerArgs;
use commands::costs::{LmiArgs, StampDutyArgs};
use commands::repayments::RepaymentsArgs;

/// Home-loan affordability and repayment estimates
#[derive(Parser)]
#[command(
    name = "hla",
    version,
    about = "Home-loan affordability and repayment estimates",
    long_about = "Estimates serviceability-constrained borrowing power, amortization \
                  schedules, LVR and lenders'-mortgage-insurance premiums, and \
                  jurisdiction stamp duty, with decimal precision, from scenario \
                  inputs and externally supplied reference tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full affordability assessment: borrowing power, repayments, LVR/LMI, stamp duty
    BorrowingPower(BorrowingPowerArgs),
    /// Amortization schedule plus interest-only vs P&I comparison
    Repayments(RepaymentsArgs),
    /// One-off stamp duty for a price and jurisdiction
    StampDuty(StampDutyArgs),
    /// LVR and LMI premium estimate
    Lmi(LmiArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::BorrowingPower(args) => commands::borrowing_power::run(args),
        Commands::Repayments(args) => commands::repayments::run(args),
        Commands::StampDuty(args) => commands::costs::run_stamp_duty(args),
        Commands::Lmi(args) => commands::costs::run_lmi(args),
        Commands::Version => {
            println!("hla {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
