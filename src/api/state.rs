//! Application state for the Time-Value-of-Money Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::EngineConfig;

/// Shared application state.
///
/// Holds only the immutable engine configuration; every request is
/// otherwise independent.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<EngineConfig>,
}

impl AppState {
    /// Creates a new application state with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
