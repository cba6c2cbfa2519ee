//! Time-Value-of-Money Engine
//!
//! This crate converts interest rates between compounding periods, computes
//! simple and compound interest, discounts between present and future value,
//! and builds PRICE (constant installment) and SAC (constant amortization)
//! schedules. A CSV exporter and an HTTP API sit on top of the pure core.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
