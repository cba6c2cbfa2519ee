//! Response types for the Time-Value-of-Money Engine API.
//!
//! This module defines the success bodies returned by each endpoint, the
//! error response structure, and the mapping from [`EngineError`] to HTTP
//! status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AmortizationPolicy, AuditTrace, PeriodUnit, ScheduleLine, ScheduleTotals};

/// Identification shared by every successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
}

impl ResponseMeta {
    /// Creates metadata for a calculation identified by `calculation_id`.
    pub fn new(calculation_id: Uuid) -> Self {
        Self {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Response body for `POST /rates/convert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertRateResponse {
    /// Calculation metadata.
    #[serde(flatten)]
    pub meta: ResponseMeta,
    /// The rate as supplied.
    pub rate_pct: f64,
    /// The period the supplied rate is quoted for.
    pub from: PeriodUnit,
    /// The period of the converted rate.
    pub to: PeriodUnit,
    /// The equivalent rate per `to` period.
    pub converted_rate_pct: f64,
    /// Audit trace of the conversion.
    pub audit_trace: AuditTrace,
}

/// Response body for the simple and compound interest endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestResponse {
    /// Calculation metadata.
    #[serde(flatten)]
    pub meta: ResponseMeta,
    /// The rate actually applied per term period.
    pub period_rate_pct: f64,
    /// The interest accrued.
    pub interest: f64,
    /// Principal plus interest.
    pub total: f64,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// Response body for the present and future value endpoints.
///
/// Both ends of the discounting are reported; the request supplied one
/// and the engine computed the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountResponse {
    /// Calculation metadata.
    #[serde(flatten)]
    pub meta: ResponseMeta,
    /// The rate actually applied per term period.
    pub period_rate_pct: f64,
    /// Number of term periods.
    pub term: f64,
    /// Value at the start of the term.
    pub present_value: f64,
    /// Value at the end of the term.
    pub future_value: f64,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// Schedule totals rounded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedTotals {
    /// Installment of the first period.
    pub first_installment: Decimal,
    /// Installment of the last period.
    pub last_installment: Decimal,
    /// Sum of all installments.
    pub total_paid: Decimal,
    /// Sum of all amortization amounts.
    pub total_amortization: Decimal,
    /// Sum of all interest amounts.
    pub total_interest: Decimal,
}

/// Response body for `POST /schedules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Calculation metadata.
    #[serde(flatten)]
    pub meta: ResponseMeta,
    /// The repayment policy.
    pub policy: AmortizationPolicy,
    /// The amount financed.
    pub principal: f64,
    /// The rate actually applied per installment period.
    pub period_rate_pct: f64,
    /// Number of installments.
    pub term: u32,
    /// The schedule, one line per installment.
    pub lines: Vec<ScheduleLine>,
    /// Unrounded totals.
    pub totals: ScheduleTotals,
    /// Totals rounded to the configured decimal places. Absent when an
    /// amount is too large for a `Decimal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounded_totals: Option<RoundedTotals>,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidPeriodUnit { unit } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PERIOD_UNIT",
                    format!("Invalid period unit: {}", unit),
                    "Supported periods are monthly, bimonthly, quarterly, semiannual and annual",
                ),
            },
            EngineError::InvalidPolicy { policy } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_POLICY",
                    format!("Invalid amortization policy: {}", policy),
                    "Supported policies are PRICE and SAC",
                ),
            },
            EngineError::InvalidTerm { term, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_TERM",
                    format!("Invalid term '{}'", term),
                    message,
                ),
            },
            EngineError::DomainError { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "DOMAIN_ERROR",
                    "The inputs have no finite result",
                    message,
                ),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::ExportError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
        }
    }
}
