//! Source Provider Abstraction
//!
//! Uniform interface over independent geospatial lookups (infrastructure,
//! airspace restrictions, urban planning, environmental data, notices).
//! Every provider, whatever its native calling convention, is adapted behind
//! [`SourceProvider`] before it is registered, so the aggregation session
//! never special-cases provider shape.

use crate::error::ProviderError;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use async_trait::async_trait;

pub mod draining;
pub mod factory;
pub mod fixed;
pub mod http;
pub mod profile;
pub mod registry;
pub mod scripted;

pub use draining::{DrainingAdapter, NoticeFeed};
pub use factory::ProviderFactory;
pub use fixed::StaticSourceProvider;
pub use http::HttpSourceProvider;
pub use profile::{SourceConfig, SourceType};
pub use registry::SourceRegistry;
pub use scripted::{ScriptedOutcome, ScriptedProvider};

/// One kind of geospatial lookup.
///
/// Implementations must be safe to call concurrently with other providers and
/// must not touch state shared with the aggregator. They are expected to apply
/// their own internal timeout; the aggregator never retries them.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Key that identifies this provider in the aggregate and failure ledger
    fn name(&self) -> &SourceName;

    /// Look up records around the query center
    async fn fetch(&self, query: &GeoQuery) -> Result<Vec<ContextRecord>, ProviderError>;

    /// Value substituted into the aggregate when this provider fails
    fn fallback(&self) -> Vec<ContextRecord> {
        Vec::new()
    }
}
