use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;
use std::fs;

use payoff_core::coaching;

use super::{resolve_state, StateArgs};

#[derive(Args)]
pub struct CoachingArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Path to a captured coaching-service response to normalize instead of
    /// building the request figures; malformed payloads yield the fallback
    /// advice pair
    #[arg(long)]
    pub response: Option<String>,
}

pub fn run_coaching(
    args: CoachingArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.response {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{path}': {e}"))?;
        let insights = coaching::normalize_insights(&raw);
        return Ok(serde_json::to_value(insights)?);
    }

    let state = resolve_state(&args.state)?;
    let result = coaching::run_request(&state, as_of)?;
    Ok(serde_json::to_value(result)?)
}
