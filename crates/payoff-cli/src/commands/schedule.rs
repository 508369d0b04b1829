use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use payoff_core::amortization::{self, ProjectionInput};
use payoff_core::scenario;

use super::{resolve_state, StateArgs};

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub state: StateArgs,
}

pub fn run_schedule(
    args: ScheduleArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.state)?;
    let input = ProjectionInput {
        loan: state.loan,
        extra_payment: state.extra_payment,
        as_of,
    };
    let result = amortization::project(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(
    args: CompareArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.state)?;
    let input = ProjectionInput {
        loan: state.loan,
        extra_payment: state.extra_payment,
        as_of,
    };
    let result = scenario::run_comparison(&input)?;
    Ok(serde_json::to_value(result)?)
}
