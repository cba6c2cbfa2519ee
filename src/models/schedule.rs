//! Amortization schedule models.
//!
//! This module contains the [`ScheduleLine`] record emitted once per period
//! by the scheduler, the [`AmortizationPolicy`] selector and the aggregated
//! [`ScheduleTotals`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The repayment policy used to build a schedule.
///
/// # Example
///
/// ```
/// use tvm_engine::models::AmortizationPolicy;
///
/// assert_eq!("PRICE".parse::<AmortizationPolicy>().unwrap(), AmortizationPolicy::Price);
/// assert_eq!(AmortizationPolicy::Sac.to_string(), "SAC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationPolicy {
    /// Constant total installment (French amortization).
    #[serde(alias = "PRICE")]
    Price,
    /// Constant amortization, decreasing installments.
    #[serde(alias = "SAC")]
    Sac,
}

impl fmt::Display for AmortizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationPolicy::Price => f.write_str("PRICE"),
            AmortizationPolicy::Sac => f.write_str("SAC"),
        }
    }
}

impl FromStr for AmortizationPolicy {
    type Err = EngineError;

    /// Parses a policy name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(AmortizationPolicy::Price),
            "sac" => Ok(AmortizationPolicy::Sac),
            _ => Err(EngineError::InvalidPolicy {
                policy: s.to_string(),
            }),
        }
    }
}

/// A single period of an amortization schedule.
///
/// # Example
///
/// ```
/// use tvm_engine::models::ScheduleLine;
///
/// let line = ScheduleLine {
///     installment_index: 1,
///     installment_amount: 1120.0,
///     amortization_amount: 1000.0,
///     interest_amount: 120.0,
///     remaining_balance: 11000.0,
/// };
/// assert_eq!(line.installment_amount, line.amortization_amount + line.interest_amount);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLine {
    /// The 1-based period number.
    pub installment_index: u32,
    /// The total paid this period (amortization + interest).
    pub installment_amount: f64,
    /// The part of the installment that repays principal.
    pub amortization_amount: f64,
    /// The interest accrued on the opening balance.
    pub interest_amount: f64,
    /// The outstanding principal after this period.
    pub remaining_balance: f64,
}

/// Aggregated figures for a complete schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    /// Number of installments in the schedule.
    pub installments: u32,
    /// Sum of all installments.
    pub total_paid: f64,
    /// Sum of all amortization amounts.
    pub total_amortization: f64,
    /// Sum of all interest amounts.
    pub total_interest: f64,
    /// Balance left after the last installment.
    pub final_balance: f64,
}

impl ScheduleTotals {
    /// Sums a schedule. An empty slice yields all-zero totals.
    pub fn from_lines(lines: &[ScheduleLine]) -> Self {
        let mut totals = ScheduleTotals {
            installments: 0,
            total_paid: 0.0,
            total_amortization: 0.0,
            total_interest: 0.0,
            final_balance: 0.0,
        };

        for line in lines {
            totals.installments += 1;
            totals.total_paid += line.installment_amount;
            totals.total_amortization += line.amortization_amount;
            totals.total_interest += line.interest_amount;
            totals.final_balance = line.remaining_balance;
        }

        totals
    }
}
