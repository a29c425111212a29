//! Adapter for stateful submit-then-drain lookups.
//!
//! Some notice feeds expose a helper object instead of a call-and-return
//! function: a query is submitted, results accumulate inside the helper, and
//! the caller drains them afterwards. [`DrainingAdapter`] wraps such a helper
//! so it can be registered like any other [`SourceProvider`].

use crate::error::ProviderError;
use crate::provider::SourceProvider;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Stateful lookup helper with a two-step calling convention
#[async_trait]
pub trait NoticeFeed: Send {
    /// Start a lookup. Results are buffered inside the feed.
    async fn submit(&mut self, query: &GeoQuery) -> Result<(), ProviderError>;

    /// Take everything buffered since the last drain
    fn drain(&mut self) -> Vec<ContextRecord>;
}

pub struct DrainingAdapter<F> {
    name: SourceName,
    feed: Mutex<F>,
}

impl<F: NoticeFeed> DrainingAdapter<F> {
    pub fn new(name: SourceName, feed: F) -> Self {
        Self {
            name,
            feed: Mutex::new(feed),
        }
    }
}

#[async_trait]
impl<F: NoticeFeed + 'static> SourceProvider for DrainingAdapter<F> {
    fn name(&self) -> &SourceName {
        &self.name
    }

    async fn fetch(&self, query: &GeoQuery) -> Result<Vec<ContextRecord>, ProviderError> {
        // The feed's buffer is shared state; hold the lock across submit and drain
        // so concurrent callers never read each other's results.
        let mut feed = self.feed.lock().await;
        // Discard anything left over from an earlier lookup that was dropped mid-flight.
        let _ = feed.drain();
        feed.submit(query).await?;
        // An empty drain is a successful lookup with nothing found.
        Ok(feed.drain())
    }
}
