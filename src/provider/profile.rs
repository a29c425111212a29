//! Source configuration as it appears in config files.

use crate::types::ContextRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Remote JSON endpoint
    Http,
    /// Records listed inline in the config
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub source_type: SourceType,

    /// Endpoint URL (http sources only)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Provider-side request timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Inline records (static sources only)
    #[serde(default)]
    pub records: Vec<ContextRecord>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self.source_type {
            SourceType::Http => {
                let endpoint = self
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| "HTTP sources require an endpoint".to_string())?;
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(format!("Invalid endpoint URL: {}", endpoint));
                }
            }
            SourceType::Static => {
                if self.endpoint.is_some() {
                    return Err("Static sources do not take an endpoint".to_string());
                }
            }
        }
        if self.timeout_ms == Some(0) {
            return Err("timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}
