//! Error types for the geoctx context aggregator.

use crate::types::SourceName;
use thiserror::Error;

/// Malformed input detected before any provider is invoked
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid latitude: {0} (must be finite and within -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be finite and within -180..=180)")]
    InvalidLongitude(f64),

    #[error("Invalid radius: {0} km (must be finite and greater than zero)")]
    InvalidRadius(f64),

    #[error("Source name cannot be empty")]
    EmptySourceName,
}

/// Failure of a single provider lookup.
///
/// These never abort an aggregation: the session absorbs them into the
/// failure ledger and substitutes the provider's fallback.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Provider timed out after {0} ms")]
    Timeout(u128),

    #[error("Provider returned an unreadable payload: {0}")]
    Decode(String),

    #[error("Provider panicked: {0}")]
    Panicked(String),

    #[error("Provider error: {0}")]
    Other(String),
}

/// Telemetry emission errors. Logged by callers, never propagated into aggregation.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry bus closed")]
    BusClosed,

    #[error("Telemetry sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Why a session stopped before settling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller fired the session's cancellation token.
    Caller,
    /// The overall session timeout expired.
    Deadline,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Caller => write!(f, "cancelled by caller"),
            CancelReason::Deadline => write!(f, "session timeout expired"),
        }
    }
}

/// Errors surfaced to callers of the aggregator
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),

    #[error("No source providers registered")]
    NoProviders,

    #[error("Duplicate source name: {0}")]
    DuplicateSource(SourceName),

    #[error("Aggregation session already used (state: {0})")]
    SessionReused(String),

    #[error("Aggregation cancelled: {0}")]
    Cancelled(CancelReason),

    #[error("Systemic failure: {0}")]
    Systemic(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AggregateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AggregateError::Cancelled(_))
    }
}

impl From<config::ConfigError> for AggregateError {
    fn from(err: config::ConfigError) -> Self {
        AggregateError::ConfigError(err.to_string())
    }
}
