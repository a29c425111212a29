//! Inbound entry point: `aggregate(center, radius_km)`.

use crate::aggregate::result::ContextAggregate;
use crate::aggregate::session::{AggregationSession, SessionOptions};
use crate::config::GeoctxConfig;
use crate::error::AggregateError;
use crate::provider::SourceRegistry;
use crate::telemetry::TelemetryRuntime;
use crate::types::{Coordinate, GeoQuery};
use tokio_util::sync::CancellationToken;

/// Long-lived aggregator. Each call builds a fresh single-use session over the
/// same registry.
#[derive(Clone)]
pub struct ContextAggregator {
    registry: SourceRegistry,
    options: SessionOptions,
    telemetry: Option<TelemetryRuntime>,
}

impl ContextAggregator {
    pub fn new(registry: SourceRegistry, options: SessionOptions) -> Self {
        Self {
            registry,
            options,
            telemetry: None,
        }
    }

    pub fn from_config(config: &GeoctxConfig) -> Result<Self, AggregateError> {
        let registry = SourceRegistry::from_config(config)?;
        Ok(Self::new(registry, config.aggregation.session_options()))
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryRuntime) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn telemetry(&self) -> Option<&TelemetryRuntime> {
        self.telemetry.as_ref()
    }

    /// A new session in the `Created` state, for callers that want to observe
    /// progress or hold the cancellation token themselves.
    pub fn session(&self) -> AggregationSession {
        AggregationSession::new(&self.registry, self.options.clone(), self.telemetry.clone())
    }

    pub async fn aggregate(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<ContextAggregate, AggregateError> {
        let query = GeoQuery::new(center, radius_km)?;
        self.session().run(query).await
    }

    /// Like [`aggregate`](Self::aggregate), cancelled when `cancel` fires
    pub async fn aggregate_with_cancel(
        &self,
        center: Coordinate,
        radius_km: f64,
        cancel: &CancellationToken,
    ) -> Result<ContextAggregate, AggregateError> {
        let query = GeoQuery::new(center, radius_km)?;
        self.session().linked_to(cancel).run(query).await
    }
}
