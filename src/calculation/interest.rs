//! Simple interest, compound interest and present/future value.
//!
//! Every function here takes a rate that already matches the term's period
//! unit. Run the rate through [`convert_rate`](super::convert_rate) first
//! when it is quoted for a different period.

use crate::error::{EngineError, EngineResult};
use crate::models::InterestResult;

use super::ensure_finite;

/// Validates a term for the closed-form calculators.
///
/// Fractional terms are allowed; negative and non-finite ones are not.
fn check_term(n: f64) -> EngineResult<f64> {
    if !n.is_finite() || n < 0.0 {
        return Err(EngineError::invalid_term(
            n,
            "term must be a finite, non-negative number of periods",
        ));
    }
    Ok(n)
}

/// Returns `(1 + rate_pct / 100)^n`.
fn growth_factor(rate_pct: f64, n: f64) -> EngineResult<f64> {
    let factor = (1.0 + rate_pct / 100.0).powf(n);
    if !factor.is_finite() {
        return Err(EngineError::domain(format!(
            "growth factor (1 + {}%)^{} has no finite value",
            rate_pct, n
        )));
    }
    Ok(factor)
}

/// Calculates simple interest: `interest = principal * i * n`.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::simple_interest;
///
/// let result = simple_interest(1000.0, 2.0, 12.0).unwrap();
/// assert!((result.interest - 240.0).abs() < 1e-9);
/// assert!((result.total - 1240.0).abs() < 1e-9);
/// ```
pub fn simple_interest(principal: f64, rate_pct: f64, n: f64) -> EngineResult<InterestResult> {
    let n = check_term(n)?;
    let interest = ensure_finite(principal * (rate_pct / 100.0) * n, "simple interest")?;
    let total = ensure_finite(principal + interest, "simple interest total")?;

    Ok(InterestResult { interest, total })
}

/// Calculates compound interest: `total = principal * (1 + i)^n`.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::compound_interest;
///
/// let result = compound_interest(1000.0, 2.0, 12.0).unwrap();
/// assert!((result.total - 1268.24).abs() < 0.01);
/// assert!((result.interest - 268.24).abs() < 0.01);
/// ```
pub fn compound_interest(principal: f64, rate_pct: f64, n: f64) -> EngineResult<InterestResult> {
    let n = check_term(n)?;
    let total = ensure_finite(principal * growth_factor(rate_pct, n)?, "compound total")?;

    Ok(InterestResult {
        interest: total - principal,
        total,
    })
}

/// Discounts a future value: `PV = future_value / (1 + i)^n`.
///
/// # Errors
///
/// Returns `DomainError` when the growth factor is zero (a rate of -100%
/// over a positive term) or has no real value.
pub fn present_value(future_value: f64, rate_pct: f64, n: f64) -> EngineResult<f64> {
    let n = check_term(n)?;
    ensure_finite(
        future_value / growth_factor(rate_pct, n)?,
        "present value",
    )
}

/// Compounds a present value: `FV = present_value * (1 + i)^n`.
pub fn future_value(present_value: f64, rate_pct: f64, n: f64) -> EngineResult<f64> {
    let n = check_term(n)?;
    ensure_finite(
        present_value * growth_factor(rate_pct, n)?,
        "future value",
    )
}
