//! Milestone timeline derivation.
//!
//! Scans a scenario schedule for percent-paid-off and balance-threshold
//! markers, maps user life events onto the calendar, and brackets everything
//! between a journey-start and a payoff-complete entry. Milestones are
//! recomputed in full on every schedule change; nothing is updated
//! incrementally.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{add_months, amortize, AmortizationSchedule};
use crate::types::{with_metadata, ComputationOutput, ExtraPayment, LifeEvent, LoanTerms, Money};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Percent-paid-off markers, in emission order.
const PERCENT_MILESTONES: [u32; 3] = [25, 50, 75];

/// Balance thresholds, in emission order. A threshold only applies when the
/// starting principal exceeds it.
const BALANCE_THRESHOLDS: [Decimal; 2] = [dec!(200_000), dec!(100_000)];

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Timeline request: loan, extra payment, life events, reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineInput {
    pub loan: LoanTerms,
    #[serde(default)]
    pub extra_payment: ExtraPayment,
    #[serde(default)]
    pub life_events: Vec<LifeEvent>,
    pub as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// What a milestone marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    JourneyStart,
    PercentPaidOff { percent: u32 },
    BalanceThreshold { threshold: Money },
    LifeEvent { id: String },
    PayoffComplete,
}

/// A dated progress marker for timeline display. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub date: NaiveDate,
    /// Borrower's age at the milestone, floored to a whole year. For
    /// schedule-derived milestones this is `current_age + months/12` and
    /// ignores the actual birth month; life events carry their own target
    /// age instead.
    pub age_at_event: u32,
    pub kind: MilestoneKind,
    pub label: String,
    pub subtitle: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the scenario schedule and derive its milestone timeline, wrapped
/// in the standard output envelope.
pub fn run_timeline(input: &TimelineInput) -> PayoffResult<ComputationOutput<Vec<Milestone>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = amortize(&input.loan, &input.extra_payment, input.as_of)?;
    if schedule.is_empty() {
        warnings.push("Degenerate loan terms; timeline spans a single date".to_string());
    }

    let skipped = input
        .life_events
        .iter()
        .filter(|e| e.target_age < input.loan.current_age)
        .count();
    if skipped > 0 {
        warnings.push(format!(
            "{skipped} life event(s) before the current age were excluded"
        ));
    }

    let milestones = derive_milestones(&schedule, &input.loan, &input.life_events, input.as_of)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Schedule Scan with Life-Event Overlay",
        input,
        warnings,
        elapsed,
        milestones,
    ))
}

/// Derive the ordered milestone list for a scenario schedule.
///
/// Each rule is evaluated independently; the first data point satisfying a
/// threshold wins and the marker is never re-emitted, tracked with explicit
/// flags rather than assumed from balance monotonicity. The result is sorted
/// ascending by date with ties broken by insertion order (stable sort), so
/// repeated invocations with identical inputs are byte-identical.
pub fn derive_milestones(
    schedule: &AmortizationSchedule,
    loan: &LoanTerms,
    life_events: &[LifeEvent],
    as_of: NaiveDate,
) -> PayoffResult<Vec<Milestone>> {
    let mut milestones = Vec::new();

    milestones.push(Milestone {
        date: as_of,
        age_at_event: loan.current_age,
        kind: MilestoneKind::JourneyStart,
        label: "Your Journey Starts Here".to_string(),
        subtitle: format!("Remaining Principal: {}", format_money(loan.principal)),
    });

    let mut percent_hit = [false; PERCENT_MILESTONES.len()];
    let mut threshold_hit = [false; BALANCE_THRESHOLDS.len()];

    for point in &schedule.points {
        for (idx, percent) in PERCENT_MILESTONES.iter().enumerate() {
            if percent_hit[idx] || loan.principal <= Decimal::ZERO {
                continue;
            }
            let target = Decimal::from(*percent) / dec!(100);
            if point.cumulative_principal_paid / loan.principal >= target {
                percent_hit[idx] = true;
                milestones.push(Milestone {
                    date: point.date,
                    age_at_event: loan.current_age + point.month / 12,
                    kind: MilestoneKind::PercentPaidOff { percent: *percent },
                    label: format!("{percent}% Paid Off"),
                    subtitle: "You're making great progress!".to_string(),
                });
            }
        }

        for (idx, threshold) in BALANCE_THRESHOLDS.iter().enumerate() {
            if threshold_hit[idx] || loan.principal <= *threshold {
                continue;
            }
            if point.remaining_balance <= *threshold {
                threshold_hit[idx] = true;
                milestones.push(Milestone {
                    date: point.date,
                    age_at_event: loan.current_age + point.month / 12,
                    kind: MilestoneKind::BalanceThreshold {
                        threshold: *threshold,
                    },
                    label: format!("Under ${}k Balance!", (threshold / dec!(1_000)).normalize()),
                    subtitle: "The finish line is getting closer!".to_string(),
                });
            }
        }
    }

    for event in life_events {
        if event.target_age < loan.current_age {
            continue;
        }
        let years_out = event.target_age - loan.current_age;
        milestones.push(Milestone {
            date: add_months(as_of, years_out * 12)?,
            // The event's own target age, not recomputed from the date:
            // life events are calendar-independent of the loan schedule.
            age_at_event: event.target_age,
            kind: MilestoneKind::LifeEvent {
                id: event.id.clone(),
            },
            label: event.name.clone(),
            subtitle: "A personal milestone for you.".to_string(),
        });
    }

    milestones.push(Milestone {
        date: schedule.payoff_date,
        age_at_event: loan.current_age + schedule.month_count() / 12,
        kind: MilestoneKind::PayoffComplete,
        label: "Mortgage Free!".to_string(),
        subtitle: "Congratulations! You've paid off your loan.".to_string(),
    });

    // Vec::sort_by_key is stable, which is what keeps tie order deterministic.
    milestones.sort_by_key(|m| m.date);
    Ok(milestones)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a currency amount as whole dollars with thousands separators.
fn format_money(amount: Money) -> String {
    let rounded = amount.round();
    let negative = rounded.is_sign_negative();
    let unsigned = rounded.abs().to_string();
    let digits = unsigned.split('.').next().unwrap_or("0");

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn day_one() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    /// Zero-rate loan: straight-line principal retirement makes milestone
    /// positions exact (1,000/month against 120,000).
    fn straight_line_loan() -> LoanTerms {
        LoanTerms {
            principal: dec!(120_000),
            annual_rate_pct: Decimal::ZERO,
            remaining_term_months: 120,
            current_age: 35,
        }
    }

    fn standard_loan() -> LoanTerms {
        LoanTerms {
            principal: dec!(300_000),
            annual_rate_pct: dec!(6.5),
            remaining_term_months: 120,
            current_age: 35,
        }
    }

    fn schedule_for(loan: &LoanTerms) -> AmortizationSchedule {
        amortize(loan, &ExtraPayment::default(), day_one()).unwrap()
    }

    // -----------------------------------------------------------------------
    // 1. Exactly one journey-start and one payoff-complete, start first
    // -----------------------------------------------------------------------
    #[test]
    fn test_bracketing_milestones() {
        let loan = standard_loan();
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();

        let starts = milestones
            .iter()
            .filter(|m| m.kind == MilestoneKind::JourneyStart)
            .count();
        let ends = milestones
            .iter()
            .filter(|m| m.kind == MilestoneKind::PayoffComplete)
            .count();
        assert_eq!(starts, 1);
        assert_eq!(ends, 1);

        assert_eq!(milestones[0].kind, MilestoneKind::JourneyStart);
        assert_eq!(milestones[0].date, day_one());
        assert_eq!(milestones[0].age_at_event, 35);
        assert_eq!(
            milestones[0].subtitle,
            "Remaining Principal: $300,000"
        );
        assert_eq!(
            milestones.last().unwrap().kind,
            MilestoneKind::PayoffComplete
        );
    }

    // -----------------------------------------------------------------------
    // 2. Sorted ascending by date
    // -----------------------------------------------------------------------
    #[test]
    fn test_sorted_by_date() {
        let loan = standard_loan();
        let events = vec![
            LifeEvent {
                id: "e1".into(),
                name: "Kids start college".into(),
                target_age: 40,
            },
            LifeEvent {
                id: "e2".into(),
                name: "Retirement".into(),
                target_age: 65,
            },
        ];
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &events, day_one()).unwrap();

        for pair in milestones.windows(2) {
            assert!(
                pair[0].date <= pair[1].date,
                "Milestones out of order: {} after {}",
                pair[0].date,
                pair[1].date
            );
        }
    }

    // -----------------------------------------------------------------------
    // 3. Percent milestones land on the first qualifying month
    // -----------------------------------------------------------------------
    #[test]
    fn test_percent_milestone_positions() {
        let loan = straight_line_loan();
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();

        // 1,000/month: 25% at month 30, 50% at month 60, 75% at month 90.
        for (percent, month) in [(25u32, 30u32), (50, 60), (75, 90)] {
            let m = milestones
                .iter()
                .find(|m| m.kind == MilestoneKind::PercentPaidOff { percent })
                .unwrap_or_else(|| panic!("{percent}% milestone missing"));
            assert_eq!(m.date, add_months(day_one(), month - 1).unwrap());
            assert_eq!(m.age_at_event, 35 + month / 12);
            assert_eq!(m.label, format!("{percent}% Paid Off"));
        }
    }

    // -----------------------------------------------------------------------
    // 4. Balance thresholds apply only when principal exceeds them
    // -----------------------------------------------------------------------
    #[test]
    fn test_balance_threshold_applicability() {
        let loan = standard_loan();
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();
        for threshold in [dec!(200_000), dec!(100_000)] {
            assert!(
                milestones
                    .iter()
                    .any(|m| m.kind == MilestoneKind::BalanceThreshold { threshold }),
                "Threshold {} missing for a 300k loan",
                threshold
            );
        }

        let small = LoanTerms {
            principal: dec!(80_000),
            annual_rate_pct: dec!(6.5),
            remaining_term_months: 120,
            current_age: 35,
        };
        let milestones =
            derive_milestones(&schedule_for(&small), &small, &[], day_one()).unwrap();
        assert!(
            !milestones
                .iter()
                .any(|m| matches!(m.kind, MilestoneKind::BalanceThreshold { .. })),
            "No threshold milestones expected when principal is below both thresholds"
        );
    }

    // -----------------------------------------------------------------------
    // 5. Threshold fires on the first month at or below the line
    // -----------------------------------------------------------------------
    #[test]
    fn test_threshold_first_match() {
        let loan = straight_line_loan();
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();

        // Balance hits 100,000 after month 20 of straight-line payoff.
        let m = milestones
            .iter()
            .find(|m| {
                m.kind
                    == MilestoneKind::BalanceThreshold {
                        threshold: dec!(100_000),
                    }
            })
            .unwrap();
        assert_eq!(m.date, add_months(day_one(), 19).unwrap());
        assert_eq!(m.label, "Under $100k Balance!");
    }

    // -----------------------------------------------------------------------
    // 6. Life events before the current age are excluded
    // -----------------------------------------------------------------------
    #[test]
    fn test_past_life_event_excluded() {
        let loan = standard_loan();
        let events = vec![
            LifeEvent {
                id: "past".into(),
                name: "Graduated".into(),
                target_age: 22,
            },
            LifeEvent {
                id: "future".into(),
                name: "Sabbatical".into(),
                target_age: 42,
            },
        ];
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &events, day_one()).unwrap();

        assert!(!milestones
            .iter()
            .any(|m| m.kind == MilestoneKind::LifeEvent { id: "past".into() }));

        let future = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::LifeEvent { id: "future".into() })
            .unwrap();
        assert_eq!(future.date, add_months(day_one(), 7 * 12).unwrap());
        assert_eq!(future.age_at_event, 42);
        assert_eq!(future.label, "Sabbatical");
    }

    // -----------------------------------------------------------------------
    // 7. Ties keep insertion order: journey-start before a same-day event
    // -----------------------------------------------------------------------
    #[test]
    fn test_tie_order_stable() {
        let loan = standard_loan();
        let events = vec![LifeEvent {
            id: "today".into(),
            name: "Big birthday".into(),
            target_age: 35,
        }];
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &events, day_one()).unwrap();

        let start_idx = milestones
            .iter()
            .position(|m| m.kind == MilestoneKind::JourneyStart)
            .unwrap();
        let event_idx = milestones
            .iter()
            .position(|m| m.kind == MilestoneKind::LifeEvent { id: "today".into() })
            .unwrap();
        assert!(start_idx < event_idx);
    }

    // -----------------------------------------------------------------------
    // 8. Repeated derivation is identical
    // -----------------------------------------------------------------------
    #[test]
    fn test_deterministic() {
        let loan = standard_loan();
        let events = vec![LifeEvent {
            id: "e".into(),
            name: "Sabbatical".into(),
            target_age: 42,
        }];
        let schedule = schedule_for(&loan);
        let first = derive_milestones(&schedule, &loan, &events, day_one()).unwrap();
        let second = derive_milestones(&schedule, &loan, &events, day_one()).unwrap();
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // 9. Empty schedule still brackets the timeline at the reference date
    // -----------------------------------------------------------------------
    #[test]
    fn test_empty_schedule_brackets() {
        let loan = LoanTerms {
            principal: Decimal::ZERO,
            ..standard_loan()
        };
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();

        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[0].kind, MilestoneKind::JourneyStart);
        assert_eq!(milestones[1].kind, MilestoneKind::PayoffComplete);
        assert_eq!(milestones[1].date, day_one());
        assert_eq!(milestones[1].age_at_event, 35);
    }

    // -----------------------------------------------------------------------
    // 10. Payoff age floors the month count
    // -----------------------------------------------------------------------
    #[test]
    fn test_payoff_age_floored() {
        let loan = LoanTerms {
            remaining_term_months: 30,
            ..standard_loan()
        };
        let milestones =
            derive_milestones(&schedule_for(&loan), &loan, &[], day_one()).unwrap();
        let payoff = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::PayoffComplete)
            .unwrap();
        // 30 months = 2.5 years, floored onto age 35.
        assert_eq!(payoff.age_at_event, 37);
    }

    // -----------------------------------------------------------------------
    // 11. Envelope warns about excluded life events
    // -----------------------------------------------------------------------
    #[test]
    fn test_run_timeline_warns_on_excluded_events() {
        let input = TimelineInput {
            loan: standard_loan(),
            extra_payment: ExtraPayment::default(),
            life_events: vec![LifeEvent {
                id: "past".into(),
                name: "Graduated".into(),
                target_age: 22,
            }],
            as_of: day_one(),
        };
        let output = run_timeline(&input).unwrap();
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("excluded")));
        assert!(!output
            .result
            .iter()
            .any(|m| matches!(m.kind, MilestoneKind::LifeEvent { .. })));
    }
}
