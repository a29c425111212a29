//! Integration tests for the submit-then-drain adapter inside a full session

use super::test_utils::{options, query, registry};
use async_trait::async_trait;
use geoctx::aggregate::AggregationSession;
use geoctx::error::ProviderError;
use geoctx::provider::{DrainingAdapter, NoticeFeed, ScriptedProvider};
use geoctx::types::{ContextRecord, GeoQuery, SourceKind, SourceName};
use std::sync::Arc;

/// Feed that returns one notice per submitted query, or nothing when quiet
struct NoticeBoard {
    quiet: bool,
    pending: Vec<ContextRecord>,
}

#[async_trait]
impl NoticeFeed for NoticeBoard {
    async fn submit(&mut self, query: &GeoQuery) -> Result<(), ProviderError> {
        if !self.quiet {
            self.pending.push(
                ContextRecord::new("A0421/26", "notam")
                    .with_name("Crane erected")
                    .with_location(query.center()),
            );
        }
        Ok(())
    }

    fn drain(&mut self) -> Vec<ContextRecord> {
        std::mem::take(&mut self.pending)
    }
}

fn notams(quiet: bool) -> Arc<DrainingAdapter<NoticeBoard>> {
    Arc::new(DrainingAdapter::new(
        SourceName::from(SourceKind::Notams),
        NoticeBoard {
            quiet,
            pending: Vec::new(),
        },
    ))
}

#[tokio::test]
async fn test_drained_notices_land_in_the_aggregate() {
    let (mut registry, _) = registry(vec![ScriptedProvider::with_items("urban", 1)]);
    registry.register(notams(false)).unwrap();

    let aggregate = AggregationSession::new(&registry, options(), None)
        .run(query())
        .await
        .unwrap();
    assert_eq!(aggregate.notams().len(), 1);
    assert_eq!(aggregate.notams()[0].name.as_deref(), Some("Crane erected"));
}

#[tokio::test]
async fn test_empty_drain_is_success_not_failure() {
    let (mut registry, _) = registry(vec![ScriptedProvider::with_items("urban", 1)]);
    registry.register(notams(true)).unwrap();

    let aggregate = AggregationSession::new(&registry, options(), None)
        .run(query())
        .await
        .unwrap();
    assert!(aggregate.notams().is_empty());
    assert!(aggregate.is_complete());
}
