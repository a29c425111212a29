//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! workspace files, then `GEOCTX__*` environment variables. Validation collects
//! every problem instead of stopping at the first.

use crate::aggregate::SessionOptions;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use crate::provider::{SourceConfig, SourceType};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoctxConfig {
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Source definitions keyed by source name
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session timing knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Per-source ceiling in milliseconds (0 disables)
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Whole-session ceiling in milliseconds (0 disables)
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,

    /// Grace period for cancelled invocations in milliseconds
    #[serde(default = "default_cancel_grace_ms")]
    pub cancel_grace_ms: u64,
}

pub(crate) fn default_source_timeout_ms() -> u64 {
    15_000
}

pub(crate) fn default_session_timeout_ms() -> u64 {
    30_000
}

pub(crate) fn default_cancel_grace_ms() -> u64 {
    250
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            source_timeout_ms: default_source_timeout_ms(),
            session_timeout_ms: default_session_timeout_ms(),
            cancel_grace_ms: default_cancel_grace_ms(),
        }
    }
}

impl AggregationConfig {
    pub fn session_options(&self) -> SessionOptions {
        let non_zero = |ms: u64| (ms > 0).then(|| Duration::from_millis(ms));
        SessionOptions {
            source_timeout: non_zero(self.source_timeout_ms),
            session_timeout: non_zero(self.session_timeout_ms),
            cancel_grace: Duration::from_millis(self.cancel_grace_ms),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.session_timeout_ms > 0
            && self.source_timeout_ms > 0
            && self.source_timeout_ms > self.session_timeout_ms
        {
            return Err(format!(
                "source_timeout_ms ({}) exceeds session_timeout_ms ({})",
                self.source_timeout_ms, self.session_timeout_ms
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    Source(String, String),
    Aggregation(String),
    Logging(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::Source(name, msg) => write!(f, "Source '{}': {}", name, msg),
            ConfigValidationError::Aggregation(msg) => write!(f, "Aggregation: {}", msg),
            ConfigValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl GeoctxConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        for (name, source) in &self.sources {
            if name.trim().is_empty() {
                errors.push(ConfigValidationError::Source(
                    name.clone(),
                    "source name cannot be empty".to_string(),
                ));
            }
            if let Err(e) = source.validate() {
                errors.push(ConfigValidationError::Source(name.clone(), e));
            }
        }

        if let Err(e) = self.aggregation.validate() {
            errors.push(ConfigValidationError::Aggregation(e));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ConfigValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
