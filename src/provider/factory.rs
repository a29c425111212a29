//! Builds providers from configuration.

use crate::error::AggregateError;
use crate::provider::profile::{SourceConfig, SourceType};
use crate::provider::{HttpSourceProvider, SourceProvider, StaticSourceProvider};
use crate::types::SourceName;
use std::sync::Arc;
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(
        name: &str,
        config: &SourceConfig,
    ) -> Result<Arc<dyn SourceProvider>, AggregateError> {
        let source_name = SourceName::new(name).map_err(AggregateError::Validation)?;
        config
            .validate()
            .map_err(|e| AggregateError::ConfigError(format!("Source '{}': {}", name, e)))?;

        match config.source_type {
            SourceType::Http => {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    AggregateError::ConfigError(format!("Source '{}': missing endpoint", name))
                })?;
                let provider = HttpSourceProvider::new(
                    source_name,
                    endpoint,
                    config.timeout_ms.map(Duration::from_millis),
                )
                .map_err(|e| AggregateError::ConfigError(format!("Source '{}': {}", name, e)))?;
                Ok(Arc::new(provider))
            }
            SourceType::Static => Ok(Arc::new(StaticSourceProvider::new(
                source_name,
                config.records.clone(),
            ))),
        }
    }
}
