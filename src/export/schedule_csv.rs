//! Delimited-text export of amortization schedules.

use serde::Serialize;

use crate::config::ExportConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::ScheduleLine;

use super::format_amount;

/// Column titles, in output order.
pub const CSV_HEADERS: [&str; 5] = [
    "Installment",
    "Installment Amount",
    "Amortization",
    "Interest",
    "Remaining Balance",
];

#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Installment")]
    installment_index: u32,
    #[serde(rename = "Installment Amount")]
    installment_amount: String,
    #[serde(rename = "Amortization")]
    amortization_amount: String,
    #[serde(rename = "Interest")]
    interest_amount: String,
    #[serde(rename = "Remaining Balance")]
    remaining_balance: String,
}

impl CsvRow {
    fn from_line(line: &ScheduleLine, decimal_places: u32) -> EngineResult<Self> {
        Ok(CsvRow {
            installment_index: line.installment_index,
            installment_amount: format_amount(line.installment_amount, decimal_places)?,
            amortization_amount: format_amount(line.amortization_amount, decimal_places)?,
            interest_amount: format_amount(line.interest_amount, decimal_places)?,
            remaining_balance: format_amount(line.remaining_balance, decimal_places)?,
        })
    }
}

fn export_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::ExportError {
        message: e.to_string(),
    }
}

/// Writes a schedule as delimited text, one row per line in order.
///
/// # Errors
///
/// Returns `ExportError` if the schedule is empty, the delimiter is not a
/// single ASCII character, or an amount is not finite.
///
/// # Examples
///
/// ```
/// use tvm_engine::calculation::build_schedule;
/// use tvm_engine::config::ExportConfig;
/// use tvm_engine::export::schedule_to_csv;
/// use tvm_engine::models::AmortizationPolicy;
///
/// let lines = build_schedule(AmortizationPolicy::Sac, 12_000.0, 1.0, 12).unwrap();
/// let csv = schedule_to_csv(&lines, &ExportConfig::default()).unwrap();
///
/// let mut rows = csv.lines();
/// assert_eq!(rows.next(), Some("Installment;Installment Amount;Amortization;Interest;Remaining Balance"));
/// assert_eq!(rows.next(), Some("1;1120.00;1000.00;120.00;11000.00"));
/// ```
pub fn schedule_to_csv(lines: &[ScheduleLine], config: &ExportConfig) -> EngineResult<String> {
    if lines.is_empty() {
        return Err(EngineError::ExportError {
            message: "schedule is empty; generate a PRICE or SAC schedule first".to_string(),
        });
    }

    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| EngineError::ExportError {
            message: format!(
                "delimiter '{}' is not a single ASCII character",
                config.delimiter
            ),
        })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(config.include_header)
        .from_writer(Vec::new());

    for line in lines {
        writer
            .serialize(CsvRow::from_line(line, config.decimal_places)?)
            .map_err(export_error)?;
    }

    let bytes = writer.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}
