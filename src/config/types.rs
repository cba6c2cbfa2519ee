//! Configuration types for the engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// CSV export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Column separator. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Decimal places monetary amounts are rounded to.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// File name offered for download.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Whether the first row carries column titles.
    #[serde(default = "default_true")]
    pub include_header: bool,
}

/// Request limits enforced by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Longest schedule, in periods, a single request may ask for.
    #[serde(default = "default_max_schedule_term")]
    pub max_schedule_term: u32,
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use tvm_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.export.delimiter, ';');
/// assert_eq!(config.limits.max_schedule_term, 1200);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Server section.
    #[serde(default)]
    pub server: ServerConfig,
    /// Export section.
    #[serde(default)]
    pub export: ExportConfig,
    /// Limits section.
    #[serde(default)]
    pub limits: LimitsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_delimiter() -> char {
    ';'
}

fn default_decimal_places() -> u32 {
    2
}

fn default_file_name() -> String {
    "amortization_schedule.csv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_schedule_term() -> u32 {
    1200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            decimal_places: default_decimal_places(),
            file_name: default_file_name(),
            include_header: true,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_schedule_term: default_max_schedule_term(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` string to bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
