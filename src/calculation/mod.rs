//! Calculation logic for the Time-Value-of-Money Engine.
//!
//! This module contains the pure calculation core: equivalent rate
//! conversion between compounding periods, simple and compound interest,
//! present and future value, and PRICE/SAC amortization schedules. Nothing
//! here logs, retains state between calls, or returns a non-finite number.

mod amortization;
mod interest;
mod rate_conversion;

pub use amortization::{build_schedule, price_installment, schedule_term};
pub use interest::{compound_interest, future_value, present_value, simple_interest};
pub use rate_conversion::convert_rate;

use crate::error::{EngineError, EngineResult};

/// Rejects NaN and infinite values with a `DomainError` naming the quantity.
pub(crate) fn ensure_finite(value: f64, what: &str) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::DomainError {
            message: format!("{} is not finite ({})", what, value),
        })
    }
}
