//! Boundary to the external financial-coaching text service.
//!
//! The core never talks to the network. Its obligations here are exactly
//! two: assemble the summary figures the service consumes (never the
//! per-month schedule), and structurally validate whatever payload comes
//! back, substituting a static fallback pair when the call fails or the
//! shape is wrong. The payload's declared type is never trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::scenario::{compare, summarize, SavingsSummary};
use crate::types::{with_metadata, ComputationOutput, ExtraPayment, LifeEvent, LoanTerms, PlannerState};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// Everything the coaching service is given: the raw inputs plus the
/// baseline-vs-scenario summary figures. Deliberately excludes the data
/// point sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingRequest {
    pub loan: LoanTerms,
    pub extra_payment: ExtraPayment,
    pub life_events: Vec<LifeEvent>,
    pub savings: SavingsSummary,
}

/// Build the coaching request for a planner state, wrapped in the standard
/// output envelope.
pub fn run_request(
    state: &PlannerState,
    as_of: NaiveDate,
) -> PayoffResult<ComputationOutput<CoachingRequest>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let comparison = compare(&state.loan, &state.extra_payment, as_of)?;
    if comparison.scenario.is_empty() {
        warnings.push("Degenerate loan terms; savings figures are zero".to_string());
    }
    let savings = summarize(&state.loan, &comparison);

    let request = CoachingRequest {
        loan: state.loan.clone(),
        extra_payment: state.extra_payment.clone(),
        life_events: state.life_events.clone(),
        savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Coaching Summary Figures (no per-month data)",
        state,
        warnings,
        elapsed,
        request,
    ))
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// The two free-text lists the service returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInsights {
    /// Strategies to accelerate the payoff further.
    #[serde(alias = "actionableAdvice")]
    pub actionable_advice: Vec<String>,
    /// Predicted financial events over the remaining loan term.
    #[serde(alias = "futureConsiderations")]
    pub future_considerations: Vec<String>,
}

/// Static pair substituted whenever the service is unreachable,
/// unconfigured, or returns a malformed payload.
pub fn fallback_insights() -> FinancialInsights {
    FinancialInsights {
        actionable_advice: vec![
            "Could not fetch coaching insights at this time. Please check your API key and \
             network connection."
                .to_string(),
            "Remember that making extra payments is a powerful way to build equity and save \
             on interest."
                .to_string(),
            "Keep up the great work on your financial journey!".to_string(),
        ],
        future_considerations: Vec::new(),
    }
}

/// Validate a raw service payload into insights, falling back on any shape
/// mismatch. Total: never returns an error.
///
/// The service sometimes wraps its JSON in markdown code fences; those are
/// stripped first. Both camelCase (wire) and snake_case field names are
/// accepted; both fields must be arrays of strings.
pub fn normalize_insights(raw: &str) -> FinancialInsights {
    let body = strip_code_fences(raw);
    serde_json::from_str(body).unwrap_or_else(|_| fallback_insights())
}

/// Strip a leading/trailing ``` fence (with optional `json` tag) if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => trimmed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
