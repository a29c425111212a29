//! Session-scoped telemetry.

pub mod policy;
pub mod service;

pub use service::TelemetryRuntime;
