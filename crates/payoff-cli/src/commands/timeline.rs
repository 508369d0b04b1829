use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use payoff_core::milestones::{self, TimelineInput};

use super::{resolve_state, StateArgs};

#[derive(Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub state: StateArgs,
}

pub fn run_timeline(
    args: TimelineArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let state = resolve_state(&args.state)?;
    let input = TimelineInput {
        loan: state.loan,
        extra_payment: state.extra_payment,
        life_events: state.life_events,
        as_of,
    };
    let result = milestones::run_timeline(&input)?;
    Ok(serde_json::to_value(result)?)
}
