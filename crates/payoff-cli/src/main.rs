mod commands;
mod input;
mod output;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::coaching::CoachingArgs;
use commands::schedule::{CompareArgs, ScheduleArgs};
use commands::timeline::TimelineArgs;

/// Mortgage payoff projections and milestone timelines
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Mortgage payoff projections and milestone timelines",
    long_about = "A CLI for projecting mortgage amortization schedules with decimal \
                  precision. Supports extra-payment scenarios, baseline comparisons, \
                  milestone timeline derivation, and coaching-service summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Reference date for "today"; defaults to the current local date
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the amortization schedule with the extra payment applied
    Schedule(ScheduleArgs),
    /// Compare the zero-extra baseline against the extra-payment scenario
    Compare(CompareArgs),
    /// Derive the milestone timeline for the scenario schedule
    Timeline(TimelineArgs),
    /// Build the coaching request figures, or normalize a captured response
    Coaching(CoachingArgs),
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

    // The only place wall-clock time enters; everything downstream takes
    // the reference date explicitly.
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args, as_of),
        Commands::Compare(args) => commands::schedule::run_compare(args, as_of),
        Commands::Timeline(args) => commands::timeline::run_timeline(args, as_of),
        Commands::Coaching(args) => commands::coaching::run_coaching(args, as_of),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
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
