//! Provider that serves a fixed record set.

use crate::error::ProviderError;
use crate::provider::SourceProvider;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use async_trait::async_trait;

/// Returns the same records for every query. Used for configured fixtures
/// and offline runs.
pub struct StaticSourceProvider {
    name: SourceName,
    records: Vec<ContextRecord>,
}

impl StaticSourceProvider {
    pub fn new(name: SourceName, records: Vec<ContextRecord>) -> Self {
        Self { name, records }
    }
}

#[async_trait]
impl SourceProvider for StaticSourceProvider {
    fn name(&self) -> &SourceName {
        &self.name
    }

    async fn fetch(&self, _query: &GeoQuery) -> Result<Vec<ContextRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}
