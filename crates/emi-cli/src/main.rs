mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::schedule::{ScheduleArgs, ValidateArgs};

/// Loan amortization schedules with decimal precision
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan amortization schedule calculator",
    long_about = "Computes level-payment (EMI) amortization schedules with decimal \
                  precision. Given a principal, an annual rate in percent and a term \
                  in months, produces the month-by-month breakdown of interest and \
                  principal alongside the running balance."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Validate loan inputs without computing a schedule
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Validate(args) => commands::schedule::run_validate(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            // Rejected input renders as a notification payload, not a schedule
            if value.get("notification").is_some() {
                process::exit(2);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
