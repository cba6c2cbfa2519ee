//! Core data models for the Time-Value-of-Money Engine.
//!
//! This module contains the domain models shared by the calculation core,
//! the exporter and the HTTP API.

mod calculation_result;
mod period_unit;
mod schedule;

pub use calculation_result::{AuditStep, AuditTrace, InterestResult};
pub use period_unit::PeriodUnit;
pub use schedule::{AmortizationPolicy, ScheduleLine, ScheduleTotals};
