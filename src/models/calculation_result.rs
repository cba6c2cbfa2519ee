//! Calculation result models for the Time-Value-of-Money Engine.
//!
//! This module contains the flat [`InterestResult`] record returned by the
//! interest calculators and the [`AuditTrace`] structures the API attaches
//! to every response.

use serde::{Deserialize, Serialize};

/// The outcome of a simple or compound interest calculation.
///
/// # Example
///
/// ```
/// use tvm_engine::models::InterestResult;
///
/// let result = InterestResult {
///     interest: 240.0,
///     total: 1240.0,
/// };
/// assert_eq!(result.total - result.interest, 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestResult {
    /// The interest accrued over the term.
    pub interest: f64,
    /// Principal plus interest.
    pub total: f64,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the operation that was applied.
    pub rule_id: String,
    /// The human-readable name of the operation.
    pub rule_name: String,
    /// The closed-form expression that was evaluated.
    pub formula: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use tvm_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}
