//! Configuration loading and management for the Time-Value-of-Money Engine.
//!
//! This module loads the engine configuration from a YAML file: the HTTP
//! bind address, CSV export settings and request limits. Every field has a
//! default, so a missing section falls back to [`EngineConfig::default`].
//!
//! # Example
//!
//! ```no_run
//! use tvm_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("CSV delimiter: {}", loader.config().export.delimiter);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{EngineConfig, ExportConfig, LimitsConfig, ServerConfig};
