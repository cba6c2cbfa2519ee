//! Export of calculation results for download.
//!
//! Core amounts are `f64`; this module turns them into fixed-scale
//! [`rust_decimal::Decimal`] values and writes amortization schedules as
//! delimited text.

mod schedule_csv;

pub use schedule_csv::{CSV_HEADERS, schedule_to_csv};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Converts an amount to a `Decimal` rounded half away from zero.
///
/// # Examples
///
/// ```
/// use tvm_engine::export::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(888.4878867834161, 2).unwrap(), Decimal::from_str("888.49").unwrap());
/// assert!(round_amount(f64::NAN, 2).is_err());
/// ```
pub fn round_amount(value: f64, decimal_places: u32) -> EngineResult<Decimal> {
    let decimal = Decimal::from_f64(value).ok_or_else(|| EngineError::ExportError {
        message: format!("amount {} cannot be represented as a decimal", value),
    })?;
    if decimal.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(decimal.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats an amount with exactly `decimal_places` fractional digits.
///
/// Finite amounts too large for a `Decimal` are written from the `f64`
/// directly; at that magnitude they carry no fractional part to round.
pub fn format_amount(value: f64, decimal_places: u32) -> EngineResult<String> {
    match round_amount(value, decimal_places) {
        Ok(rounded) => Ok(format!("{:.*}", decimal_places as usize, rounded)),
        Err(_) if value.is_finite() => Ok(format!("{:.*}", decimal_places as usize, value)),
        Err(err) => Err(err),
    }
}
