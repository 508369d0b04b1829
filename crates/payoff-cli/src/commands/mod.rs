pub mod coaching;
pub mod schedule;
pub mod timeline;

use clap::Args;
use rust_decimal::Decimal;

use payoff_core::{ExtraPayment, LoanTerms, PayoffError, PlannerState};

use crate::input;

/// Planner-state flags shared by every subcommand. A JSON/YAML record via
/// `--input` (or piped stdin) takes precedence over individual flags; life
/// events can only come from a record.
#[derive(Args)]
pub struct StateArgs {
    /// Remaining principal balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Remaining term: whole years
    #[arg(long, default_value = "0")]
    pub term_years: u32,

    /// Remaining term: additional months
    #[arg(long, default_value = "0")]
    pub term_months: u32,

    /// Borrower's current age
    #[arg(long)]
    pub age: Option<u32>,

    /// Extra monthly principal payment
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Path to a JSON or YAML planner record (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Resolve the planner state from `--input`, piped stdin, or flags.
pub fn resolve_state(args: &StateArgs) -> Result<PlannerState, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_record(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let loan = LoanTerms {
        principal: args.principal.ok_or_else(|| missing_flag("--principal"))?,
        annual_rate_pct: args.rate.ok_or_else(|| missing_flag("--rate"))?,
        remaining_term_months: args.term_years * 12 + args.term_months,
        current_age: args.age.ok_or_else(|| missing_flag("--age"))?,
    };

    Ok(PlannerState {
        loan,
        extra_payment: ExtraPayment {
            monthly_amount: args.extra.unwrap_or(Decimal::ZERO),
        },
        life_events: Vec::new(),
    })
}

fn missing_flag(flag: &str) -> PayoffError {
    PayoffError::InvalidInput {
        field: flag.to_string(),
        reason: "required when no --input record or piped state is given".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
