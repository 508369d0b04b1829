//! Level-payment amortization projection with a constant extra payment.
//!
//! Turns loan terms plus an optional extra monthly payment into a
//! month-by-month payoff schedule, summary totals, and payoff date. All math
//! in `rust_decimal::Decimal`; the reference date is an explicit parameter so
//! projections are reproducible.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PayoffError;
use crate::types::{with_metadata, ComputationOutput, ExtraPayment, LoanTerms, Money, Rate};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_DIVISOR: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Projection request: loan, extra payment, and the reference "today".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub loan: LoanTerms,
    #[serde(default)]
    pub extra_payment: ExtraPayment,
    /// Calendar month of the first data point. Production callers pass the
    /// real current date; tests pass a fixed one.
    pub as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One paid month of the schedule. Index starts at 1; the first point is
/// dated at the reference date itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationDataPoint {
    /// Month number (1-indexed).
    pub month: u32,
    /// Calendar month of this payment.
    pub date: NaiveDate,
    /// Interest accrued on the balance this month.
    pub interest_portion: Money,
    /// Principal actually retired this month (scheduled + extra, capped at
    /// the remaining balance so the final month never overshoots).
    pub principal_portion: Money,
    /// Balance after this payment. Non-increasing across the schedule.
    pub remaining_balance: Money,
    /// Running interest total through this month.
    pub cumulative_interest_paid: Money,
    /// Running principal total through this month.
    pub cumulative_principal_paid: Money,
}

/// The full ordered schedule plus summary totals. Produced atomically by one
/// engine invocation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub points: Vec<AmortizationDataPoint>,
    /// Sum of all interest portions.
    pub total_interest: Money,
    /// Principal plus total interest.
    pub total_paid: Money,
    /// Date of the last data point, or the reference date if the schedule is
    /// empty.
    pub payoff_date: NaiveDate,
}

impl AmortizationSchedule {
    pub fn month_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project a payoff schedule, wrapped in the standard output envelope.
pub fn project(input: &ProjectionInput) -> PayoffResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if is_degenerate(&input.loan) {
        warnings.push(
            "Degenerate loan terms (non-positive principal, negative rate, or zero term); \
             returning an empty schedule"
                .to_string(),
        );
    } else if input.loan.annual_rate_pct.is_zero() {
        warnings.push("Zero interest rate; straight-line principal division applied".to_string());
    }

    let schedule = amortize(&input.loan, &input.extra_payment, input.as_of)?;

    if schedule.points.len() == 1 {
        warnings.push("Extra payment retires the full balance in the first month".to_string());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization with Constant Extra Principal",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}

/// Compute the payoff schedule for a loan with a constant extra payment.
///
/// Pure and deterministic given `as_of`. Degenerate terms yield an empty
/// schedule with `total_paid = principal` and `payoff_date = as_of`. A rate
/// of exactly zero falls back to straight-line principal division; the month
/// loop applies the same capped update either way, so no division artifact
/// can reach the output.
pub fn amortize(
    loan: &LoanTerms,
    extra: &ExtraPayment,
    as_of: NaiveDate,
) -> PayoffResult<AmortizationSchedule> {
    if is_degenerate(loan) {
        return Ok(AmortizationSchedule {
            points: Vec::new(),
            total_interest: Decimal::ZERO,
            total_paid: loan.principal,
            payoff_date: as_of,
        });
    }

    let num_payments = loan.remaining_term_months;
    let monthly_rate = loan.annual_rate_pct / PERCENT_DIVISOR / MONTHS_PER_YEAR;
    let payment = base_monthly_payment(loan.principal, monthly_rate, num_payments);

    let mut points = Vec::with_capacity(num_payments as usize);
    let mut balance = loan.principal;
    let mut total_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;

    for month in 1..=num_payments {
        if balance <= Decimal::ZERO {
            break;
        }

        let interest = balance * monthly_rate;
        let scheduled_principal = payment - interest;

        // Cap: the final month absorbs rounding and any oversized extra
        // payment; the balance never goes negative.
        let mut principal_paid = scheduled_principal + extra.monthly_amount;
        if principal_paid > balance {
            principal_paid = balance;
        }

        balance -= principal_paid;
        total_interest += interest;
        cumulative_principal += principal_paid;

        points.push(AmortizationDataPoint {
            month,
            date: add_months(as_of, month - 1)?,
            interest_portion: interest,
            principal_portion: principal_paid,
            remaining_balance: balance,
            cumulative_interest_paid: total_interest,
            cumulative_principal_paid: cumulative_principal,
        });
    }

    let payoff_date = points.last().map(|p| p.date).unwrap_or(as_of);

    Ok(AmortizationSchedule {
        points,
        total_interest,
        total_paid: loan.principal + total_interest,
        payoff_date,
    })
}

/// True when the terms are defined to produce an empty schedule rather than
/// an error. A rate of exactly zero is NOT degenerate: it gets the
/// straight-line fallback.
pub fn is_degenerate(loan: &LoanTerms) -> bool {
    loan.principal <= Decimal::ZERO
        || loan.annual_rate_pct < Decimal::ZERO
        || loan.remaining_term_months == 0
}

// ---------------------------------------------------------------------------
// Payment math
// ---------------------------------------------------------------------------

/// Required monthly payment ignoring the extra:
/// `P * r / (1 - (1 + r)^-n)`, or straight-line `P / n` when the rate is
/// zero (the annuity formula divides by zero there).
fn base_monthly_payment(principal: Money, monthly_rate: Rate, num_payments: u32) -> Money {
    if monthly_rate <= Decimal::ZERO {
        return principal / Decimal::from(num_payments);
    }

    let denom = Decimal::ONE - iterative_pow_recip(Decimal::ONE + monthly_rate, num_payments);
    if denom <= Decimal::ZERO {
        return principal / Decimal::from(num_payments);
    }

    principal * monthly_rate / denom
}

/// Compute base^n for a positive integer exponent via iterative
/// multiplication.
fn iterative_pow(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

/// Compute 1 / base^n.
fn iterative_pow_recip(base: Decimal, n: u32) -> Decimal {
    let pow = iterative_pow(base, n);
    if pow.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE / pow
    }
}

/// Step a date forward by whole calendar months, clamping the day when the
/// target month is shorter (Jan 31 + 1 month = Feb 28/29).
pub(crate) fn add_months(date: NaiveDate, months: u32) -> PayoffResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| PayoffError::DateError(format!("{date} + {months} months overflows")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
