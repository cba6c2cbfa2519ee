//! Equivalent rate conversion.
//!
//! This module re-expresses a periodic compound rate for a different
//! compounding period while keeping the two rates equivalent.

use crate::error::{EngineError, EngineResult};
use crate::models::PeriodUnit;

use super::ensure_finite;

/// Converts `rate_pct` quoted per `from` period into the equivalent rate per
/// `to` period.
///
/// With `i = rate_pct / 100` and `k = months(to) / months(from)` the result
/// is `((1 + i)^k - 1) * 100`. Converting `a -> b -> a` returns the original
/// rate within floating-point tolerance, and converting to the same unit
/// returns the input unchanged.
///
/// # Errors
///
/// Returns `DomainError` when the rate is not finite or the conversion has
/// no finite result (a growth factor `1 + i` below zero raised to a
/// fractional power).
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::convert_rate;
/// use tvm_engine::models::PeriodUnit;
///
/// let monthly = convert_rate(12.0, PeriodUnit::Annual, PeriodUnit::Monthly).unwrap();
/// assert!((monthly - 0.948879).abs() < 1e-6);
///
/// let annual = convert_rate(1.0, PeriodUnit::Monthly, PeriodUnit::Annual).unwrap();
/// assert!((annual - 12.682503).abs() < 1e-6);
/// ```
pub fn convert_rate(rate_pct: f64, from: PeriodUnit, to: PeriodUnit) -> EngineResult<f64> {
    let rate_pct = ensure_finite(rate_pct, "rate")?;
    if from == to {
        return Ok(rate_pct);
    }

    let i = rate_pct / 100.0;
    let k = f64::from(to.months()) / f64::from(from.months());

    // ln_1p/exp_m1 keep precision for small rates; they are undefined once
    // the growth factor is no longer positive, where powf still has an
    // answer for integral exponents.
    let equivalent = if 1.0 + i > 0.0 {
        (k * i.ln_1p()).exp_m1()
    } else {
        (1.0 + i).powf(k) - 1.0
    };

    if !equivalent.is_finite() {
        return Err(EngineError::domain(format!(
            "cannot convert {}% from {} to {}: growth factor {} has no real power {}",
            rate_pct,
            from,
            to,
            1.0 + i,
            k
        )));
    }

    Ok(equivalent * 100.0)
}
