//! HTTP request handlers for the Time-Value-of-Money Engine API.
//!
//! This module contains the handler functions for all API endpoints. The
//! handlers translate requests into calls to the pure calculation core and
//! log one event per outcome.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    build_schedule, compound_interest, convert_rate, future_value, present_value, schedule_term,
    simple_interest,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::export::{round_amount, schedule_to_csv};
use crate::models::{
    AmortizationPolicy, AuditStep, AuditTrace, PeriodUnit, ScheduleLine, ScheduleTotals,
};

use super::request::{
    ConvertRateRequest, FutureValueRequest, InterestRequest, PresentValueRequest, RateInput,
    ScheduleRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, ConvertRateResponse, DiscountResponse, InterestResponse,
    ResponseMeta, RoundedTotals, ScheduleResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rates/convert", post(convert_rate_handler))
        .route("/interest/simple", post(simple_interest_handler))
        .route("/interest/compound", post(compound_interest_handler))
        .route("/present-value", post(present_value_handler))
        .route("/future-value", post(future_value_handler))
        .route("/schedules", post(schedule_handler))
        .route("/schedules/csv", post(schedule_csv_handler))
        .with_state(state)
}

/// Collects audit steps for one request.
struct AuditRecorder {
    steps: Vec<AuditStep>,
    started: Instant,
}

impl AuditRecorder {
    fn start() -> Self {
        Self {
            steps: Vec::new(),
            started: Instant::now(),
        }
    }

    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        formula: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            formula: formula.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn finish(self) -> AuditTrace {
        AuditTrace {
            steps: self.steps,
            duration_us: self.started.elapsed().as_micros() as u64,
        }
    }
}

/// Builds the 400 response for a body axum could not deserialize.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn error_response(err: EngineError, correlation_id: Uuid, operation: &str) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Calculation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Turns a calculation outcome into a JSON response.
fn json_response<T: Serialize>(
    result: EngineResult<T>,
    correlation_id: Uuid,
    operation: &str,
    started: Instant,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = started.elapsed().as_micros() as u64,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => error_response(err, correlation_id, operation),
    }
}

/// Extracts the request body or short-circuits with a 400 response.
macro_rules! parse_payload {
    ($payload:expr, $correlation_id:expr) => {
        match $payload {
            Ok(Json(request)) => request,
            Err(rejection) => return rejection_response(rejection, $correlation_id),
        }
    };
}

/// Handler for POST /rates/convert.
async fn convert_rate_handler(
    payload: Result<Json<ConvertRateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "rate_conversion", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_rate_conversion(&request, correlation_id),
        correlation_id,
        "rate_conversion",
        started,
    )
}

/// Handler for POST /interest/simple.
async fn simple_interest_handler(
    payload: Result<Json<InterestRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "simple_interest", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_interest(&request, InterestKind::Simple, correlation_id),
        correlation_id,
        "simple_interest",
        started,
    )
}

/// Handler for POST /interest/compound.
async fn compound_interest_handler(
    payload: Result<Json<InterestRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "compound_interest", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_interest(&request, InterestKind::Compound, correlation_id),
        correlation_id,
        "compound_interest",
        started,
    )
}

/// Handler for POST /present-value.
async fn present_value_handler(
    payload: Result<Json<PresentValueRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "present_value", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_present_value(&request, correlation_id),
        correlation_id,
        "present_value",
        started,
    )
}

/// Handler for POST /future-value.
async fn future_value_handler(
    payload: Result<Json<FutureValueRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "future_value", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_future_value(&request, correlation_id),
        correlation_id,
        "future_value",
        started,
    )
}

/// Handler for POST /schedules.
async fn schedule_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "schedule", "Processing calculation request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);

    json_response(
        perform_schedule(&request, state.config(), correlation_id),
        correlation_id,
        "schedule",
        started,
    )
}

/// Handler for POST /schedules/csv.
///
/// Returns the schedule as a downloadable delimited-text file.
async fn schedule_csv_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation = "schedule_csv", "Processing export request");
    let started = Instant::now();
    let request = parse_payload!(payload, correlation_id);
    let config = state.config();

    let mut audit = AuditRecorder::start();
    let csv = compute_schedule(&request, config, &mut audit)
        .and_then(|schedule| schedule_to_csv(&schedule.lines, &config.export));

    match csv {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation = "schedule_csv",
                bytes = body.len(),
                duration_us = started.elapsed().as_micros() as u64,
                "Export completed successfully"
            );
            let disposition = format!("attachment; filename=\"{}\"", config.export.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(err) => error_response(err, correlation_id, "schedule_csv"),
    }
}

/// Resolves the rate to apply per term period, converting it when the
/// request names two different periods.
fn resolve_period_rate(rate: &RateInput, audit: &mut AuditRecorder) -> EngineResult<f64> {
    let Some((from, to)) = rate.period_units()? else {
        return Ok(rate.rate_pct);
    };

    let converted = convert_rate(rate.rate_pct, from, to)?;
    audit.record(
        "rate_conversion",
        "Equivalent Rate Conversion",
        "(1 + i)^(months(to) / months(from)) - 1",
        json!({
            "rate_pct": rate.rate_pct,
            "from": from,
            "to": to
        }),
        json!({ "rate_pct": converted }),
        format!(
            "{}% per {} period is equivalent to {:.6}% per {} period",
            rate.rate_pct, from, converted, to
        ),
    );
    Ok(converted)
}

fn perform_rate_conversion(
    request: &ConvertRateRequest,
    correlation_id: Uuid,
) -> EngineResult<ConvertRateResponse> {
    let mut audit = AuditRecorder::start();
    let from: PeriodUnit = request.from.parse()?;
    let to: PeriodUnit = request.to.parse()?;

    let rate = RateInput {
        rate_pct: request.rate_pct,
        rate_period: Some(from.to_string()),
        term_period: Some(to.to_string()),
    };
    let converted_rate_pct = resolve_period_rate(&rate, &mut audit)?;

    Ok(ConvertRateResponse {
        meta: ResponseMeta::new(correlation_id),
        rate_pct: request.rate_pct,
        from,
        to,
        converted_rate_pct,
        audit_trace: audit.finish(),
    })
}

#[derive(Debug, Clone, Copy)]
enum InterestKind {
    Simple,
    Compound,
}

fn perform_interest(
    request: &InterestRequest,
    kind: InterestKind,
    correlation_id: Uuid,
) -> EngineResult<InterestResponse> {
    let mut audit = AuditRecorder::start();
    let period_rate_pct = resolve_period_rate(&request.rate, &mut audit)?;

    let (result, rule_id, rule_name, formula) = match kind {
        InterestKind::Simple => (
            simple_interest(request.principal, period_rate_pct, request.term)?,
            "simple_interest",
            "Simple Interest",
            "J = C * i * n",
        ),
        InterestKind::Compound => (
            compound_interest(request.principal, period_rate_pct, request.term)?,
            "compound_interest",
            "Compound Interest",
            "M = C * (1 + i)^n",
        ),
    };

    audit.record(
        rule_id,
        rule_name,
        formula,
        json!({
            "principal": request.principal,
            "rate_pct": period_rate_pct,
            "term": request.term
        }),
        json!({ "interest": result.interest, "total": result.total }),
        format!(
            "{} over {} periods at {}% yields {} interest",
            request.principal, request.term, period_rate_pct, result.interest
        ),
    );

    Ok(InterestResponse {
        meta: ResponseMeta::new(correlation_id),
        period_rate_pct,
        interest: result.interest,
        total: result.total,
        audit_trace: audit.finish(),
    })
}

fn perform_present_value(
    request: &PresentValueRequest,
    correlation_id: Uuid,
) -> EngineResult<DiscountResponse> {
    let mut audit = AuditRecorder::start();
    let period_rate_pct = resolve_period_rate(&request.rate, &mut audit)?;
    let pv = present_value(request.future_value, period_rate_pct, request.term)?;

    audit.record(
        "present_value",
        "Present Value",
        "PV = FV / (1 + i)^n",
        json!({
            "future_value": request.future_value,
            "rate_pct": period_rate_pct,
            "term": request.term
        }),
        json!({ "present_value": pv }),
        format!(
            "{} due in {} periods discounted at {}% is worth {} today",
            request.future_value, request.term, period_rate_pct, pv
        ),
    );

    Ok(DiscountResponse {
        meta: ResponseMeta::new(correlation_id),
        period_rate_pct,
        term: request.term,
        present_value: pv,
        future_value: request.future_value,
        audit_trace: audit.finish(),
    })
}

fn perform_future_value(
    request: &FutureValueRequest,
    correlation_id: Uuid,
) -> EngineResult<DiscountResponse> {
    let mut audit = AuditRecorder::start();
    let period_rate_pct = resolve_period_rate(&request.rate, &mut audit)?;
    let fv = future_value(request.present_value, period_rate_pct, request.term)?;

    audit.record(
        "future_value",
        "Future Value",
        "FV = PV * (1 + i)^n",
        json!({
            "present_value": request.present_value,
            "rate_pct": period_rate_pct,
            "term": request.term
        }),
        json!({ "future_value": fv }),
        format!(
            "{} compounded at {}% for {} periods grows to {}",
            request.present_value, period_rate_pct, request.term, fv
        ),
    );

    Ok(DiscountResponse {
        meta: ResponseMeta::new(correlation_id),
        period_rate_pct,
        term: request.term,
        present_value: request.present_value,
        future_value: fv,
        audit_trace: audit.finish(),
    })
}

/// A schedule together with the resolved inputs it was built from.
struct BuiltSchedule {
    policy: AmortizationPolicy,
    period_rate_pct: f64,
    term: u32,
    lines: Vec<ScheduleLine>,
}

/// Validates the term against the configured limit and builds the schedule.
fn compute_schedule(
    request: &ScheduleRequest,
    config: &EngineConfig,
    audit: &mut AuditRecorder,
) -> EngineResult<BuiltSchedule> {
    let policy = request.policy()?;
    let term = schedule_term(request.term)?;
    let max_term = config.limits.max_schedule_term;
    if term > max_term {
        return Err(EngineError::InvalidTerm {
            term: term.to_string(),
            message: format!("schedule term exceeds the limit of {} periods", max_term),
        });
    }

    let period_rate_pct = resolve_period_rate(&request.rate, audit)?;
    let lines = build_schedule(policy, request.principal, period_rate_pct, term)?;
    let totals = ScheduleTotals::from_lines(&lines);

    audit.record(
        "amortization_schedule",
        &format!("{} Amortization Schedule", policy),
        match policy {
            AmortizationPolicy::Price => "PMT = P * i / (1 - (1 + i)^-n)",
            AmortizationPolicy::Sac => "A = P / n; PMT_k = A + balance_k * i",
        },
        json!({
            "policy": policy,
            "principal": request.principal,
            "rate_pct": period_rate_pct,
            "term": term
        }),
        json!({
            "installments": totals.installments,
            "total_paid": totals.total_paid,
            "total_interest": totals.total_interest,
            "final_balance": totals.final_balance
        }),
        format!(
            "{} installments repay {} with {} total interest",
            totals.installments, request.principal, totals.total_interest
        ),
    );

    Ok(BuiltSchedule {
        policy,
        period_rate_pct,
        term,
        lines,
    })
}

fn perform_schedule(
    request: &ScheduleRequest,
    config: &EngineConfig,
    correlation_id: Uuid,
) -> EngineResult<ScheduleResponse> {
    let mut audit = AuditRecorder::start();
    let schedule = compute_schedule(request, config, &mut audit)?;
    let totals = ScheduleTotals::from_lines(&schedule.lines);

    // Amounts beyond Decimal's range have no rounded view.
    let rounded_totals =
        match round_totals(&schedule.lines, &totals, config.export.decimal_places) {
            Ok(rounded) => Some(rounded),
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Omitting rounded totals"
                );
                None
            }
        };

    Ok(ScheduleResponse {
        meta: ResponseMeta::new(correlation_id),
        policy: schedule.policy,
        principal: request.principal,
        period_rate_pct: schedule.period_rate_pct,
        term: schedule.term,
        lines: schedule.lines,
        totals,
        rounded_totals,
        audit_trace: audit.finish(),
    })
}

fn round_totals(
    lines: &[ScheduleLine],
    totals: &ScheduleTotals,
    decimal_places: u32,
) -> EngineResult<RoundedTotals> {
    let first = lines.first().map_or(0.0, |l| l.installment_amount);
    let last = lines.last().map_or(0.0, |l| l.installment_amount);

    Ok(RoundedTotals {
        first_installment: round_amount(first, decimal_places)?,
        last_installment: round_amount(last, decimal_places)?,
        total_paid: round_amount(totals.total_paid, decimal_places)?,
        total_amortization: round_amount(totals.total_amortization, decimal_places)?,
        total_interest: round_amount(totals.total_interest, decimal_places)?,
    })
}
