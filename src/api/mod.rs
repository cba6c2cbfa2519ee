//! HTTP API module for the Time-Value-of-Money Engine.
//!
//! This module exposes rate conversion, the interest calculators,
//! discounting and amortization schedules (as JSON or CSV) over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ConvertRateRequest, FutureValueRequest, InterestRequest, PresentValueRequest, RateInput,
    ScheduleRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, ConvertRateResponse, DiscountResponse, InterestResponse,
    ResponseMeta, RoundedTotals, ScheduleResponse,
};
pub use state::AppState;
