//! CLI route: single route table and run context. Dispatches to the aggregator and presentation.

use crate::aggregate::ContextAggregator;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_aggregate_json, format_aggregate_text, format_sources_json, format_sources_text,
    SourceRow,
};
use crate::config::{ConfigLoader, GeoctxConfig, SourceType};
use crate::error::AggregateError;
use crate::telemetry::{TelemetryRuntime, TracingSink};
use crate::types::Coordinate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runtime context for CLI execution: loaded config and the aggregator built from it.
pub struct RunContext {
    config: GeoctxConfig,
    aggregator: ContextAggregator,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, AggregateError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::from_config(config)
    }

    pub fn from_config(config: GeoctxConfig) -> Result<Self, AggregateError> {
        let aggregator = ContextAggregator::from_config(&config)?
            .with_telemetry(TelemetryRuntime::new(Arc::new(TracingSink)));
        Ok(Self { config, aggregator })
    }

    pub fn aggregator(&self) -> &ContextAggregator {
        &self.aggregator
    }

    /// Run one command. `cancel` aborts an in-flight aggregation.
    pub async fn execute(
        &self,
        command: &Commands,
        cancel: &CancellationToken,
    ) -> Result<String, AggregateError> {
        match command {
            Commands::Aggregate {
                lat,
                lon,
                radius_km,
                format,
                session_timeout_ms,
            } => {
                let center = Coordinate::new(*lat, *lon)?;
                let aggregator = match session_timeout_ms {
                    Some(ms) => self.with_session_timeout(*ms)?,
                    None => self.aggregator.clone(),
                };
                let aggregate = aggregator
                    .aggregate_with_cancel(center, *radius_km, cancel)
                    .await?;
                info!(
                    session = aggregate.session_id(),
                    failed = aggregate.failures().len(),
                    "Aggregation finished"
                );
                Ok(match format.as_str() {
                    "json" => format_aggregate_json(&aggregate),
                    _ => format_aggregate_text(&aggregate),
                })
            }
            Commands::Sources { format } => {
                let rows = self.source_rows();
                Ok(match format.as_str() {
                    "json" => format_sources_json(&rows),
                    _ => format_sources_text(&rows),
                })
            }
        }
    }

    /// Override the session timeout, held to the same bounds as the config value.
    fn with_session_timeout(&self, ms: u64) -> Result<ContextAggregator, AggregateError> {
        let mut aggregation = self.config.aggregation.clone();
        aggregation.session_timeout_ms = ms;
        aggregation.validate().map_err(|e| {
            AggregateError::ConfigError(format!("--session-timeout-ms: {}", e))
        })?;
        let mut options = self.aggregator.options().clone();
        options.session_timeout = aggregation.session_options().session_timeout;
        let mut aggregator = ContextAggregator::new(self.aggregator.registry().clone(), options);
        if let Some(telemetry) = self.aggregator.telemetry() {
            aggregator = aggregator.with_telemetry(telemetry.clone());
        }
        Ok(aggregator)
    }

    fn source_rows(&self) -> Vec<SourceRow> {
        let mut rows: Vec<SourceRow> = self
            .config
            .sources
            .iter()
            .map(|(name, source)| SourceRow {
                name: name.clone(),
                source_type: match source.source_type {
                    SourceType::Http => "http".to_string(),
                    SourceType::Static => "static".to_string(),
                },
                endpoint: source.endpoint.clone(),
                enabled: source.enabled,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }
}
