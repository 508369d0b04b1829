use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per month).
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Terms of the loan being paid down. Immutable per calculation.
///
/// Degenerate values (non-positive principal, negative rate, zero term) are
/// not errors: the engine returns an empty schedule and upstream decides
/// whether that means "not ready to display".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Remaining principal balance.
    pub principal: Money,
    /// Annual interest rate as a percentage (6.5 = 6.5%), matching the
    /// loan-form input convention.
    pub annual_rate_pct: Decimal,
    /// Remaining term in months (the input layer folds years into this).
    pub remaining_term_months: u32,
    /// Borrower's current age, used only for milestone age labels.
    pub current_age: u32,
}

/// A constant additional principal payment applied every month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraPayment {
    /// Extra amount paid each month on top of the required payment.
    pub monthly_amount: Money,
}

/// A user-authored personal milestone, independent of the loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    /// Caller-assigned unique id.
    pub id: String,
    /// Free-text name ("Kids start college").
    pub name: String,
    /// Age at which the event occurs. Events before `current_age` are
    /// dropped from the timeline.
    pub target_age: u32,
}

/// The persisted input trio saved across sessions. The core is agnostic to
/// where it is stored; partial records load via the serde defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    pub loan: LoanTerms,
    #[serde(default)]
    pub extra_payment: ExtraPayment,
    #[serde(default)]
    pub life_events: Vec<LifeEvent>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
