//! Baseline-vs-scenario comparison.
//!
//! The "original" schedule is the loan with no extra payment; the "scenario"
//! schedule applies the user's extra payment. Savings figures are the deltas
//! between the two.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortize, AmortizationSchedule, ProjectionInput};
use crate::types::{with_metadata, ComputationOutput, ExtraPayment, LoanTerms, Money, Years};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Both schedules from one pair of engine invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Zero-extra baseline.
    pub original: AmortizationSchedule,
    /// Schedule with the user's extra payment applied.
    pub scenario: AmortizationSchedule,
}

/// Summary deltas between baseline and scenario. These are the only figures
/// downstream collaborators (display, coaching) need; the per-month sequence
/// stays inside the schedules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub original_months: u32,
    pub scenario_months: u32,
    pub months_saved: u32,
    pub years_saved: Years,
    pub interest_saved: Money,
    pub original_total_interest: Money,
    pub scenario_total_interest: Money,
    pub original_payoff_date: NaiveDate,
    pub scenario_payoff_date: NaiveDate,
    /// Borrower's age when the scenario schedule ends, floored.
    pub payoff_age: u32,
}

/// Comparison result plus its savings summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub original: AmortizationSchedule,
    pub scenario: AmortizationSchedule,
    pub savings: SavingsSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the engine twice and bundle both schedules with the savings summary.
pub fn run_comparison(input: &ProjectionInput) -> PayoffResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let comparison = compare(&input.loan, &input.extra_payment, input.as_of)?;
    if comparison.scenario.is_empty() {
        warnings.push("Degenerate loan terms; both schedules are empty".to_string());
    }
    let savings = summarize(&input.loan, &comparison);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Baseline vs Extra-Payment Scenario Comparison",
        input,
        warnings,
        elapsed,
        ComparisonOutput {
            original: comparison.original,
            scenario: comparison.scenario,
            savings,
        },
    ))
}

/// Compute the zero-extra baseline and the extra-payment scenario for the
/// same loan and reference date.
pub fn compare(
    loan: &LoanTerms,
    extra: &ExtraPayment,
    as_of: NaiveDate,
) -> PayoffResult<ScenarioComparison> {
    let original = amortize(loan, &ExtraPayment::default(), as_of)?;
    let scenario = amortize(loan, extra, as_of)?;
    Ok(ScenarioComparison { original, scenario })
}

/// Derive the savings figures from a comparison.
pub fn summarize(loan: &LoanTerms, comparison: &ScenarioComparison) -> SavingsSummary {
    let original_months = comparison.original.month_count();
    let scenario_months = comparison.scenario.month_count();
    let months_saved = original_months.saturating_sub(scenario_months);

    SavingsSummary {
        original_months,
        scenario_months,
        months_saved,
        years_saved: Decimal::from(months_saved) / dec!(12),
        interest_saved: comparison.original.total_interest - comparison.scenario.total_interest,
        original_total_interest: comparison.original.total_interest,
        scenario_total_interest: comparison.scenario.total_interest,
        original_payoff_date: comparison.original.payoff_date,
        scenario_payoff_date: comparison.scenario.payoff_date,
        payoff_age: loan.current_age + scenario_months / 12,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
