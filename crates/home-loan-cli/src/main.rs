mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::repayment::{PaymentArgs, ScheduleArgs};

/// Housing-loan repayment calculations
#[derive(Parser)]
#[command(
    name = "hloan",
    version,
    about = "Housing-loan repayment calculations with decimal precision",
    long_about = "A CLI for computing housing-loan repayment figures and \
                  period-by-period amortisation schedules with decimal \
                  precision. Supports equal-total and equal-principal \
                  repayment with twice-yearly bonus instalments."
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
    /// Solve the steady payment figures for a loan
    Payment(PaymentArgs),
    /// Generate the period-by-period amortisation schedule
    Schedule(ScheduleArgs),
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
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::repayment::run_payment(args),
        Commands::Schedule(args) => commands::repayment::run_schedule(args),
        Commands::Version => {
            println!("hloan {}", env!("CARGO_PKG_VERSION"));
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
