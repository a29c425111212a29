//! Registry of providers participating in an aggregation.
//!
//! Enforces unique source names so every provider outcome maps to exactly
//! one aggregate entry.

use crate::config::GeoctxConfig;
use crate::error::AggregateError;
use crate::provider::{ProviderFactory, SourceProvider};
use crate::types::SourceName;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct SourceRegistry {
    providers: Vec<Arc<dyn SourceProvider>>,
    names: BTreeSet<SourceName>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every enabled source in the configuration
    pub fn from_config(config: &GeoctxConfig) -> Result<Self, AggregateError> {
        let mut registry = Self::new();
        // Sorted for a stable registration order regardless of map iteration
        let mut names: Vec<&String> = config.sources.keys().collect();
        names.sort();
        for name in names {
            let source = &config.sources[name];
            if !source.enabled {
                debug!(source = %name, "Skipping disabled source");
                continue;
            }
            registry.register(ProviderFactory::create(name, source)?)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, provider: Arc<dyn SourceProvider>) -> Result<(), AggregateError> {
        let name = provider.name().clone();
        if !self.names.insert(name.clone()) {
            return Err(AggregateError::DuplicateSource(name));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, provider: Arc<dyn SourceProvider>) -> Result<Self, AggregateError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn providers(&self) -> &[Arc<dyn SourceProvider>] {
        &self.providers
    }

    pub fn names(&self) -> impl Iterator<Item = &SourceName> {
        self.names.iter()
    }

    pub fn contains(&self, name: &SourceName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
