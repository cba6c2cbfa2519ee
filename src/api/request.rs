//! Request types for the Time-Value-of-Money Engine API.
//!
//! This module defines the JSON request structures for every endpoint.
//! Period tags arrive as plain strings and are parsed here, so an unknown
//! tag surfaces as `InvalidPeriodUnit` rather than a JSON error.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{AmortizationPolicy, PeriodUnit};

/// A rate and the periods it should be re-expressed between.
///
/// When both `rate_period` and `term_period` are given, the rate is
/// converted from the former to the latter before the calculation runs.
/// When either is missing the rate is used as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateInput {
    /// The rate, in percent, per `rate_period`.
    pub rate_pct: f64,
    /// The period the rate is quoted for (e.g. "annual").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_period: Option<String>,
    /// The period one unit of the term represents (e.g. "monthly").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_period: Option<String>,
}

impl RateInput {
    /// Parses the period tags.
    ///
    /// Returns `Some((from, to))` only when both tags are present. Any tag
    /// that is present must be valid, even if no conversion will happen.
    pub fn period_units(&self) -> EngineResult<Option<(PeriodUnit, PeriodUnit)>> {
        let from = self
            .rate_period
            .as_deref()
            .map(str::parse::<PeriodUnit>)
            .transpose()?;
        let to = self
            .term_period
            .as_deref()
            .map(str::parse::<PeriodUnit>)
            .transpose()?;

        Ok(from.zip(to))
    }
}

/// Request body for `POST /rates/convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRateRequest {
    /// The rate, in percent, per `from` period.
    pub rate_pct: f64,
    /// The period the rate is quoted for.
    pub from: String,
    /// The period to express the rate in.
    pub to: String,
}

/// Request body for `POST /interest/simple` and `POST /interest/compound`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRequest {
    /// The amount invested or borrowed.
    pub principal: f64,
    /// The rate and its periods.
    #[serde(flatten)]
    pub rate: RateInput,
    /// Number of term periods; may be fractional.
    pub term: f64,
}

/// Request body for `POST /present-value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueRequest {
    /// The amount due at the end of the term.
    pub future_value: f64,
    /// The rate and its periods.
    #[serde(flatten)]
    pub rate: RateInput,
    /// Number of term periods; may be fractional.
    pub term: f64,
}

/// Request body for `POST /future-value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueRequest {
    /// The amount available today.
    pub present_value: f64,
    /// The rate and its periods.
    #[serde(flatten)]
    pub rate: RateInput,
    /// Number of term periods; may be fractional.
    pub term: f64,
}

/// Request body for `POST /schedules` and `POST /schedules/csv`.
///
/// The policy arrives as a string so an unknown name surfaces as
/// `InvalidPolicy` rather than a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// PRICE or SAC, in any case.
    pub policy: String,
    /// The amount financed.
    pub principal: f64,
    /// The rate and its periods.
    #[serde(flatten)]
    pub rate: RateInput,
    /// Number of installments; must be a positive whole number.
    pub term: f64,
}

impl ScheduleRequest {
    /// Parses the policy name.
    pub fn policy(&self) -> EngineResult<AmortizationPolicy> {
        self.policy.parse()
    }
}
