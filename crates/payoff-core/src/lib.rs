//! Mortgage payoff projection and milestone timeline derivation.
//!
//! Pure, synchronous computations with no I/O: every invocation allocates
//! fresh output, and "today" is always an explicit parameter. The UI,
//! persistence, and coaching-service layers are external collaborators.

pub mod amortization;
pub mod coaching;
pub mod error;
pub mod milestones;
pub mod scenario;
pub mod types;

pub use error::PayoffError;
pub use types::*;

/// Standard result type for all payoff-core operations
pub type PayoffResult<T> = Result<T, PayoffError>;
