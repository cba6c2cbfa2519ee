//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Largest scale a `rust_decimal::Decimal` can hold.
const MAX_DECIMAL_PLACES: u32 = 28;

/// Loads, validates and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── engine.yaml   # server, export and limits sections
/// ```
///
/// # Example
///
/// ```no_run
/// use tvm_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// assert!(loader.config().limits.max_schedule_term > 0);
/// # Ok::<(), tvm_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads `engine.yaml` from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or an out-of-range value
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file_path = path.as_ref().join(CONFIG_FILE_NAME);
        let path_str = file_path.display().to_string();

        let content = fs::read_to_string(&file_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_yaml_str(content: &str, origin: &str) -> EngineResult<Self> {
        Self::parse(content, origin)
    }

    fn parse(content: &str, origin: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&config).map_err(|message| EngineError::ConfigParseError {
            path: origin.to_string(),
            message,
        })?;

        Ok(Self { config })
    }

    /// Rejects values that deserialize but cannot be used.
    fn validate(config: &EngineConfig) -> Result<(), String> {
        if !config.export.delimiter.is_ascii() {
            return Err(format!(
                "export.delimiter must be a single ASCII character, got '{}'",
                config.export.delimiter
            ));
        }
        if config.export.decimal_places > MAX_DECIMAL_PLACES {
            return Err(format!(
                "export.decimal_places must be at most {}, got {}",
                MAX_DECIMAL_PLACES,
                config.export.decimal_places
            ));
        }
        if config.limits.max_schedule_term == 0 {
            return Err("limits.max_schedule_term must be positive".to_string());
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
