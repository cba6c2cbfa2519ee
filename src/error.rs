//! Error types for the Time-Value-of-Money Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the calculation core, the exporter and the
//! configuration loader can report.

use thiserror::Error;

/// The main error type for the Time-Value-of-Money Engine.
///
/// All operations in the engine return this error type. The core never
/// produces NaN or infinite sentinels; any such value surfaces as
/// [`EngineError::DomainError`].
///
/// # Example
///
/// ```
/// use tvm_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriodUnit {
///     unit: "fortnightly".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid period unit: fortnightly");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A period tag was not one of the supported compounding periods.
    #[error("Invalid period unit: {unit}")]
    InvalidPeriodUnit {
        /// The unrecognized tag.
        unit: String,
    },

    /// An amortization policy name was neither PRICE nor SAC.
    #[error("Invalid amortization policy: {policy}")]
    InvalidPolicy {
        /// The unrecognized name.
        policy: String,
    },

    /// A term length was non-positive, non-integral or otherwise unusable.
    #[error("Invalid term '{term}': {message}")]
    InvalidTerm {
        /// The term as supplied by the caller.
        term: String,
        /// A description of what made the term invalid.
        message: String,
    },

    /// A rate/exponent combination has no finite result.
    #[error("Domain error: {message}")]
    DomainError {
        /// A description of the failed computation.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A schedule could not be serialized for export.
    #[error("Export error: {message}")]
    ExportError {
        /// A description of the export failure.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_term(term: impl ToString, message: impl Into<String>) -> Self {
        EngineError::InvalidTerm {
            term: term.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        EngineError::DomainError {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
