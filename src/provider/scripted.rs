//! Scripted provider for tests, benches and dry runs.
//!
//! Each instance plays back one predetermined outcome after an optional delay
//! and counts how many times it was invoked.

use crate::error::ProviderError;
use crate::provider::SourceProvider;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Succeed with these records
    Items(Vec<ContextRecord>),
    /// Fail with a provider error
    Fail(ProviderError),
    /// Panic inside `fetch`
    Panic(String),
    /// Never resolve
    Hang,
    /// Block the worker thread for the given time, ignoring cancellation,
    /// then succeed with no records
    Block(Duration),
}

pub struct ScriptedProvider {
    name: SourceName,
    delay: Duration,
    outcome: ScriptedOutcome,
    fallback: Vec<ContextRecord>,
    fallback_panic: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>, outcome: ScriptedOutcome) -> Self {
        let name = name.into();
        let name = SourceName::new(name.clone())
            .unwrap_or_else(|_| panic!("scripted provider name must not be blank: {name:?}"));
        Self {
            name,
            delay: Duration::ZERO,
            outcome,
            fallback: Vec::new(),
            fallback_panic: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Succeed with `count` synthetic records
    pub fn with_items(name: impl Into<String>, count: usize) -> Self {
        let name = name.into();
        let records = (0..count)
            .map(|i| ContextRecord::new(format!("{name}-{i}"), name.clone()))
            .collect();
        Self::new(name, ScriptedOutcome::Items(records))
    }

    pub fn failing(name: impl Into<String>, error: ProviderError) -> Self {
        Self::new(name, ScriptedOutcome::Fail(error))
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_fallback(mut self, fallback: Vec<ContextRecord>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Make `fallback` panic with `message` instead of returning records
    pub fn with_panicking_fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback_panic = Some(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceProvider for ScriptedProvider {
    fn name(&self) -> &SourceName {
        &self.name
    }

    async fn fetch(&self, _query: &GeoQuery) -> Result<Vec<ContextRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            ScriptedOutcome::Items(records) => Ok(records.clone()),
            ScriptedOutcome::Fail(error) => Err(error.clone()),
            ScriptedOutcome::Panic(message) => panic!("{}", message),
            ScriptedOutcome::Hang => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
            ScriptedOutcome::Block(duration) => {
                std::thread::sleep(*duration);
                Ok(Vec::new())
            }
        }
    }

    fn fallback(&self) -> Vec<ContextRecord> {
        if let Some(message) = &self.fallback_panic {
            panic!("{}", message);
        }
        self.fallback.clone()
    }
}
