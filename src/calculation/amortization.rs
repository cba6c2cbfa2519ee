//! Amortization schedule generation.
//!
//! This module builds complete period-by-period schedules under the PRICE
//! (constant installment) and SAC (constant amortization) policies. A call
//! either returns every line of the schedule or fails as a whole.

use crate::error::{EngineError, EngineResult};
use crate::models::{AmortizationPolicy, ScheduleLine};

use super::ensure_finite;

/// Validates a caller-supplied schedule term.
///
/// The term must be a finite, positive integer that fits in a `u32`.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::schedule_term;
///
/// assert_eq!(schedule_term(12.0).unwrap(), 12);
/// assert!(schedule_term(0.0).is_err());
/// assert!(schedule_term(12.5).is_err());
/// ```
pub fn schedule_term(n: f64) -> EngineResult<u32> {
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(EngineError::invalid_term(
            n,
            "schedule term must be a whole number of periods",
        ));
    }
    if n <= 0.0 {
        return Err(EngineError::invalid_term(
            n,
            "schedule term must be positive",
        ));
    }
    if n > f64::from(u32::MAX) {
        return Err(EngineError::invalid_term(n, "schedule term is too large"));
    }
    Ok(n as u32)
}

/// Checks the inputs shared by both policies before any line is produced.
fn validate_inputs(principal: f64, rate_pct: f64, n: u32) -> EngineResult<f64> {
    if n == 0 {
        return Err(EngineError::invalid_term(n, "schedule term must be positive"));
    }
    ensure_finite(principal, "principal")?;
    ensure_finite(rate_pct, "rate")?;
    if rate_pct <= -100.0 {
        return Err(EngineError::domain(format!(
            "a schedule needs a rate above -100% per period, got {}%",
            rate_pct
        )));
    }
    Ok(rate_pct / 100.0)
}

/// Computes the fixed PRICE installment.
///
/// Uses the annuity formula `P * i / (1 - (1 + i)^-n)`, or `P / n` for a
/// zero rate where the formula is undefined.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::price_installment;
///
/// let pmt = price_installment(10_000.0, 1.0, 12).unwrap();
/// assert!((pmt - 888.49).abs() < 0.01);
///
/// let flat = price_installment(1_200.0, 0.0, 12).unwrap();
/// assert_eq!(flat, 100.0);
/// ```
pub fn price_installment(principal: f64, rate_pct: f64, n: u32) -> EngineResult<f64> {
    let i = validate_inputs(principal, rate_pct, n)?;
    annuity_payment(principal, i, n)
}

fn annuity_payment(principal: f64, i: f64, n: u32) -> EngineResult<f64> {
    if i == 0.0 {
        return Ok(principal / f64::from(n));
    }
    // 1 - (1 + i)^-n, without cancellation for tiny rates or long terms.
    let discount = -(-f64::from(n) * i.ln_1p()).exp_m1();
    ensure_finite(principal * i / discount, "PRICE installment")
}

/// Outstanding PRICE balance after `k` of `n` installments.
///
/// Closed form `P * ((1+i)^n - (1+i)^k) / ((1+i)^n - 1)`, arranged so no
/// power overflows for either sign of `i`. The balance after the last
/// installment is exactly zero.
fn price_balance(principal: f64, i: f64, k: u32, n: u32) -> f64 {
    if i == 0.0 {
        return principal * f64::from(n - k) / f64::from(n);
    }
    let log_growth = i.ln_1p();
    let (n, k) = (f64::from(n), f64::from(k));
    if log_growth > 0.0 {
        principal * ((k - n) * log_growth).exp_m1() / (-n * log_growth).exp_m1()
    } else {
        let total = (n * log_growth).exp_m1();
        principal * (total - (k * log_growth).exp_m1()) / total
    }
}

/// Builds an amortization schedule of `n` lines.
///
/// `rate_pct` must already be the rate for one schedule period.
///
/// # Errors
///
/// - `InvalidTerm` if `n` is zero.
/// - `DomainError` if an input is not finite, the rate is -100% or lower,
///   or any computed amount is not finite.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::build_schedule;
/// use tvm_engine::models::AmortizationPolicy;
///
/// let lines = build_schedule(AmortizationPolicy::Sac, 12_000.0, 1.0, 12).unwrap();
/// assert_eq!(lines.len(), 12);
/// assert_eq!(lines[0].installment_amount, 1120.0);
/// assert_eq!(lines[11].remaining_balance, 0.0);
/// ```
pub fn build_schedule(
    policy: AmortizationPolicy,
    principal: f64,
    rate_pct: f64,
    n: u32,
) -> EngineResult<Vec<ScheduleLine>> {
    let i = validate_inputs(principal, rate_pct, n)?;
    match policy {
        AmortizationPolicy::Price => price_schedule(principal, i, n),
        AmortizationPolicy::Sac => sac_schedule(principal, i, n),
    }
}

fn price_schedule(principal: f64, i: f64, n: u32) -> EngineResult<Vec<ScheduleLine>> {
    let pmt = annuity_payment(principal, i, n)?;
    let mut balance = principal;
    let mut lines = Vec::with_capacity(n as usize);

    for k in 1..=n {
        let interest = ensure_finite(balance * i, "interest")?;
        let next_balance = ensure_finite(price_balance(principal, i, k, n), "balance")?;

        lines.push(ScheduleLine {
            installment_index: k,
            installment_amount: pmt,
            amortization_amount: balance - next_balance,
            interest_amount: interest,
            remaining_balance: next_balance,
        });
        balance = next_balance;
    }

    Ok(lines)
}

fn sac_schedule(principal: f64, i: f64, n: u32) -> EngineResult<Vec<ScheduleLine>> {
    let amortization = ensure_finite(principal / f64::from(n), "amortization")?;
    let mut balance = principal;
    let mut lines = Vec::with_capacity(n as usize);

    for k in 1..=n {
        let interest = ensure_finite(balance * i, "interest")?;
        let installment = ensure_finite(amortization + interest, "installment")?;
        balance = if k == n {
            0.0
        } else {
            (balance - amortization).max(0.0)
        };

        lines.push(ScheduleLine {
            installment_index: k,
            installment_amount: installment,
            amortization_amount: amortization,
            interest_amount: interest,
            remaining_balance: balance,
        });
    }

    Ok(lines)
}
