//! geoctx: Resilient Geospatial Context Aggregation
//!
//! Queries a set of independent geospatial sources for one point and radius,
//! concurrently and in isolation from each other, and assembles whatever they
//! return into a single `ContextAggregate`. A failing, panicking, or slow source
//! degrades to its fallback and is named in the aggregate's failure set; it never
//! takes the rest of the aggregation down with it.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod telemetry;
pub mod types;

pub use aggregate::{ContextAggregate, ContextAggregator};
pub use error::{AggregateError, ProviderError};
pub use provider::SourceProvider;
pub use types::{ContextRecord, Coordinate, GeoQuery, SourceKind, SourceName};
