//! Integration tests for the Time-Value-of-Money Engine HTTP API.
//!
//! This test suite drives the router end to end and covers:
//! - Equivalent rate conversion
//! - Simple and compound interest, with and without period conversion
//! - Present and future value
//! - PRICE and SAC schedules, JSON and CSV
//! - Error cases

use approx::assert_relative_eq;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use tvm_engine::api::{AppState, create_router};
use tvm_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let loader = ConfigLoader::load("./config").expect("Failed to load config");
    AppState::new(loader.into_config())
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post_raw(router: Router, uri: &str, body: String) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = post_raw(router, uri, body.to_string()).await;

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn as_f64(value: &Value) -> f64 {
    value.as_f64().expect("expected a number")
}

fn rounded(value: &Value) -> Decimal {
    decimal(value.as_str().expect("expected a decimal string"))
}

// =============================================================================
// Rate Conversion
// =============================================================================

#[tokio::test]
async fn test_annual_to_monthly_conversion() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/rates/convert",
        json!({ "rate_pct": 12, "from": "annual", "to": "monthly" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(
        as_f64(&body["converted_rate_pct"]),
        0.9488792934583,
        max_relative = 1e-9
    );
    assert_eq!(body["from"], "annual");
    assert_eq!(body["to"], "monthly");
    assert!(body["calculation_id"].is_string());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["engine_version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_monthly_to_annual_conversion() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/rates/convert",
        json!({ "rate_pct": 1, "from": "monthly", "to": "annual" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(
        as_f64(&body["converted_rate_pct"]),
        12.682503013196973,
        max_relative = 1e-9
    );
}

#[tokio::test]
async fn test_period_tags_are_case_insensitive() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/rates/convert",
        json!({ "rate_pct": 3, "from": " Quarterly ", "to": "SEMIANNUAL" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["converted_rate_pct"]), 6.09, max_relative = 1e-9);
}

#[tokio::test]
async fn test_identity_conversion_returns_rate_unchanged() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/rates/convert",
        json!({ "rate_pct": 7.25, "from": "bimonthly", "to": "bimonthly" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_f64(&body["converted_rate_pct"]), 7.25);
}

// =============================================================================
// Interest
// =============================================================================

#[tokio::test]
async fn test_simple_interest_scenario() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/simple",
        json!({ "principal": 1000, "rate_pct": 2, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["interest"]), 240.0, epsilon = 1e-9);
    assert_relative_eq!(as_f64(&body["total"]), 1240.0, epsilon = 1e-9);
    assert_eq!(body["audit_trace"]["steps"].as_array().unwrap().len(), 1);
    assert_eq!(body["audit_trace"]["steps"][0]["rule_id"], "simple_interest");
}

#[tokio::test]
async fn test_compound_interest_scenario() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/compound",
        json!({ "principal": 1000, "rate_pct": 2, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["total"]), 1268.2417945625455, max_relative = 1e-12);
    assert_relative_eq!(as_f64(&body["interest"]), 268.2417945625455, max_relative = 1e-9);
}

#[tokio::test]
async fn test_compound_interest_converts_annual_rate_to_monthly_term() {
    // 12 months at the monthly equivalent of 12% a year is exactly one year.
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/compound",
        json!({
            "principal": 10000,
            "rate_pct": 12,
            "rate_period": "annual",
            "term_period": "monthly",
            "term": 12
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["total"]), 11200.0, max_relative = 1e-9);
    assert_relative_eq!(
        as_f64(&body["period_rate_pct"]),
        0.9488792934583,
        max_relative = 1e-9
    );

    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["rule_id"], "rate_conversion");
    assert_eq!(steps[0]["step_number"], 1);
    assert_eq!(steps[1]["rule_id"], "compound_interest");
    assert_eq!(steps[1]["step_number"], 2);
}

#[tokio::test]
async fn test_single_period_tag_leaves_rate_unconverted() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/simple",
        json!({ "principal": 1000, "rate_pct": 2, "rate_period": "annual", "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_f64(&body["period_rate_pct"]), 2.0);
    assert_relative_eq!(as_f64(&body["interest"]), 240.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_zero_term_accrues_no_interest() {
    for uri in ["/interest/simple", "/interest/compound"] {
        let (status, body) = post_json(
            create_router_for_test(),
            uri,
            json!({ "principal": 1000, "rate_pct": 5, "term": 0 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(as_f64(&body["interest"]), 0.0, "{}", uri);
        assert_eq!(as_f64(&body["total"]), 1000.0, "{}", uri);
    }
}

#[tokio::test]
async fn test_negative_rate_is_accepted() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/compound",
        json!({ "principal": 1000, "rate_pct": -1, "term": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["total"]), 980.1, max_relative = 1e-12);
}

// =============================================================================
// Present / Future Value
// =============================================================================

#[tokio::test]
async fn test_future_value_matches_compound_total() {
    let (_, compound) = post_json(
        create_router_for_test(),
        "/interest/compound",
        json!({ "principal": 2500, "rate_pct": 1.5, "term": 36 }),
    )
    .await;
    let (status, fv) = post_json(
        create_router_for_test(),
        "/future-value",
        json!({ "present_value": 2500, "rate_pct": 1.5, "term": 36 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fv["future_value"], compound["total"]);
    assert_eq!(as_f64(&fv["present_value"]), 2500.0);
}

#[tokio::test]
async fn test_present_value_discounts_future_amount() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/present-value",
        json!({ "future_value": 1268.2417945625455, "rate_pct": 2, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(as_f64(&body["present_value"]), 1000.0, max_relative = 1e-12);
    assert_eq!(as_f64(&body["term"]), 12.0);
    assert_eq!(body["audit_trace"]["steps"][0]["rule_id"], "present_value");
}

#[tokio::test]
async fn test_present_value_with_total_loss_rate_is_domain_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/present-value",
        json!({ "future_value": 1000, "rate_pct": -100, "term": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "DOMAIN_ERROR");
}

#[tokio::test]
async fn test_negative_term_is_invalid() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/future-value",
        json!({ "present_value": 1000, "rate_pct": 2, "term": -3 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TERM");
}

// =============================================================================
// Schedules
// =============================================================================

#[tokio::test]
async fn test_price_schedule_scenario() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "PRICE", "principal": 10000, "rate_pct": 1, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "price");
    assert_eq!(body["term"], 12);

    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 12);
    let first = as_f64(&lines[0]["installment_amount"]);
    for (index, line) in lines.iter().enumerate() {
        assert_eq!(line["installment_index"], index as u64 + 1);
        assert_relative_eq!(as_f64(&line["installment_amount"]), first, max_relative = 1e-12);
    }
    assert_relative_eq!(first, 888.4878867834, epsilon = 1e-6);
    assert!(as_f64(&lines[11]["remaining_balance"]).abs() <= 1e-6);

    assert_eq!(rounded(&body["rounded_totals"]["first_installment"]), decimal("888.49"));
    assert_eq!(rounded(&body["rounded_totals"]["total_amortization"]), decimal("10000.00"));
}

#[tokio::test]
async fn test_sac_schedule_scenario() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "SAC", "principal": 12000, "rate_pct": 1, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 12);
    for line in lines {
        assert_relative_eq!(as_f64(&line["amortization_amount"]), 1000.0, epsilon = 1e-9);
    }
    assert_relative_eq!(as_f64(&lines[0]["installment_amount"]), 1120.0, epsilon = 1e-9);
    assert_relative_eq!(as_f64(&lines[11]["installment_amount"]), 1010.0, epsilon = 1e-9);
    assert_eq!(as_f64(&lines[11]["remaining_balance"]), 0.0);
    assert_eq!(as_f64(&body["totals"]["final_balance"]), 0.0);

    assert_eq!(rounded(&body["rounded_totals"]["last_installment"]), decimal("1010"));
    assert_eq!(rounded(&body["rounded_totals"]["total_paid"]), decimal("12780"));
}

#[tokio::test]
async fn test_schedule_records_conversion_and_schedule_steps() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({
            "policy": "sac",
            "principal": 12000,
            "rate_pct": 12,
            "rate_period": "annual",
            "term_period": "monthly",
            "term": 12
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["rule_id"], "rate_conversion");
    assert_eq!(steps[1]["rule_id"], "amortization_schedule");
    assert_eq!(steps[1]["rule_name"], "SAC Amortization Schedule");
}

#[tokio::test]
async fn test_zero_term_schedule_is_invalid() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "PRICE", "principal": 10000, "rate_pct": 1, "term": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TERM");
}

#[tokio::test]
async fn test_fractional_term_schedule_is_invalid() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "SAC", "principal": 10000, "rate_pct": 1, "term": 6.5 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TERM");
}

#[tokio::test]
async fn test_schedule_above_configured_limit_is_invalid() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "SAC", "principal": 10000, "rate_pct": 1, "term": 1201 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TERM");
    assert!(body["details"].as_str().unwrap().contains("1200"));
}

#[tokio::test]
async fn test_schedule_with_total_loss_rate_is_domain_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "PRICE", "principal": 10000, "rate_pct": -100, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "DOMAIN_ERROR");
}

#[tokio::test]
async fn test_price_schedule_at_configured_limit_pays_off() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "PRICE", "principal": 100000, "rate_pct": 3, "term": 1200 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_f64(&body["totals"]["final_balance"]), 0.0);
    assert_relative_eq!(
        as_f64(&body["totals"]["total_amortization"]),
        100_000.0,
        max_relative = 1e-9
    );
    assert_eq!(
        rounded(&body["rounded_totals"]["total_amortization"]),
        decimal("100000.00")
    );
}

#[tokio::test]
async fn test_schedule_beyond_decimal_range_is_still_served() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "sac", "principal": 1e30, "rate_pct": 1, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"].as_array().unwrap().len(), 12);
    assert!(body.get("rounded_totals").is_none());
}

#[tokio::test]
async fn test_schedule_csv_beyond_decimal_range_is_still_served() {
    let response = post_raw(
        create_router_for_test(),
        "/schedules/csv",
        json!({ "policy": "sac", "principal": 1e30, "rate_pct": 1, "term": 12 }).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(csv.lines().count(), 13);
    assert!(csv.lines().last().unwrap().ends_with(";0.00"));
}

#[tokio::test]
async fn test_schedule_csv_download() {
    let response = post_raw(
        create_router_for_test(),
        "/schedules/csv",
        json!({ "policy": "SAC", "principal": 12000, "rate_pct": 1, "term": 12 }).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"amortization_schedule.csv\""
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let rows: Vec<&str> = csv.lines().collect();

    assert_eq!(rows.len(), 13);
    assert_eq!(
        rows[0],
        "Installment;Installment Amount;Amortization;Interest;Remaining Balance"
    );
    assert_eq!(rows[1], "1;1120.00;1000.00;120.00;11000.00");
    assert_eq!(rows[12], "12;1010.00;1000.00;10.00;0.00");
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_unknown_period_unit_is_rejected() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/interest/compound",
        json!({
            "principal": 1000,
            "rate_pct": 12,
            "rate_period": "annual",
            "term_period": "fortnightly",
            "term": 12
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD_UNIT");
    assert!(body["message"].as_str().unwrap().contains("fortnightly"));
}

#[tokio::test]
async fn test_unknown_policy_is_rejected() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/schedules",
        json!({ "policy": "GERMAN", "principal": 1000, "rate_pct": 1, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_POLICY");
    assert!(body["message"].as_str().unwrap().contains("GERMAN"));
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/future-value",
        json!({ "rate_pct": 2, "term": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let response = post_raw(
        create_router_for_test(),
        "/rates/convert",
        "{\"rate_pct\": 12,".to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}
