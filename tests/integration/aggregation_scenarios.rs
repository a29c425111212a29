//! Integration tests for fan-out, isolation and assembly
//!
//! Tests cover:
//! - Mixed success and failure
//! - All-empty results
//! - Panic and timeout isolation
//! - Completion-order independence
//! - Fallback substitution

use super::test_utils::{options, query, registry};
use geoctx::aggregate::{AggregationSession, ContextAggregator, SessionState};
use geoctx::error::ProviderError;
use geoctx::provider::{ScriptedOutcome, ScriptedProvider, StaticSourceProvider};
use geoctx::types::{ContextRecord, Coordinate, SourceKind, SourceName};
use std::sync::Arc;
use std::time::Duration;

fn name(value: &str) -> SourceName {
    SourceName::new(value).unwrap()
}

#[tokio::test]
async fn test_one_failure_among_four_sources() {
    let (registry, handles) = registry(vec![
        ScriptedProvider::with_items("infrastructure", 3),
        ScriptedProvider::failing("airspace-restrictions", ProviderError::Timeout(15_000)),
        ScriptedProvider::with_items("urban", 5),
        ScriptedProvider::with_items("environmental", 2),
    ]);
    let aggregator = ContextAggregator::new(registry, options());

    let aggregate = aggregator
        .aggregate(Coordinate::new(51.4775, -0.4614).unwrap(), 10.0)
        .await
        .unwrap();

    assert_eq!(aggregate.infrastructure().len(), 3);
    assert_eq!(aggregate.airspace_restrictions().len(), 0);
    assert_eq!(aggregate.urban().len(), 5);
    assert_eq!(aggregate.environmental().len(), 2);
    assert_eq!(
        aggregate.failures().iter().cloned().collect::<Vec<_>>(),
        vec![name("airspace-restrictions")]
    );
    assert_eq!(aggregate.present_count(), 3);
    for handle in handles {
        assert_eq!(handle.calls(), 1, "every provider is invoked exactly once");
    }
}

#[tokio::test]
async fn test_all_empty_is_not_all_failed() {
    let (registry, _) = registry(
        SourceKind::ALL[..4]
            .iter()
            .map(|kind| ScriptedProvider::with_items(kind.as_str(), 0))
            .collect(),
    );
    let aggregate = ContextAggregator::new(registry, options())
        .aggregate(Coordinate::new(0.0, 0.0).unwrap(), 1.0)
        .await
        .unwrap();

    assert_eq!(aggregate.source_count(), 4);
    assert!(aggregate.failures().is_empty());
    assert!(aggregate.is_complete());
    assert_eq!(aggregate.total_items(), 0);
    for (_, entry) in aggregate.entries() {
        assert!(entry.items.is_empty());
        assert!(entry.error.is_none());
    }
}

#[tokio::test]
async fn test_panicking_source_is_isolated() {
    let (registry, _) = registry(vec![
        ScriptedProvider::new("urban", ScriptedOutcome::Panic("bad geometry".to_string())),
        ScriptedProvider::with_items("environmental", 4),
    ]);
    let mut session = AggregationSession::new(&registry, options(), None);
    let aggregate = session.run(query()).await.unwrap();

    assert_eq!(session.state(), SessionState::Completed);
    assert!(aggregate.is_failed(&name("urban")));
    assert!(aggregate
        .entry(&name("urban"))
        .unwrap()
        .error
        .as_deref()
        .unwrap()
        .contains("bad geometry"));
    assert_eq!(aggregate.environmental().len(), 4);
}

#[tokio::test]
async fn test_slow_source_times_out_without_blocking_others() {
    let (registry, _) = registry(vec![
        ScriptedProvider::new("notams", ScriptedOutcome::Hang),
        ScriptedProvider::with_items("urban", 1),
    ]);
    let mut opts = options();
    opts.source_timeout = Some(Duration::from_millis(50));

    let aggregate = AggregationSession::new(&registry, opts, None)
        .run(query())
        .await
        .unwrap();

    assert!(aggregate.is_failed(&name("notams")));
    assert!(aggregate
        .entry(&name("notams"))
        .unwrap()
        .error
        .as_deref()
        .unwrap()
        .contains("timed out"));
    assert_eq!(aggregate.urban().len(), 1);
}

#[tokio::test]
async fn test_failed_source_contributes_its_fallback() {
    let cached = ContextRecord::new("cached-1", "runway").with_name("RWY 09L");
    let (registry, _) = registry(vec![ScriptedProvider::failing(
        "infrastructure",
        ProviderError::RateLimited("429".to_string()),
    )
    .with_fallback(vec![cached.clone()])]);

    let aggregate = AggregationSession::new(&registry, options(), None)
        .run(query())
        .await
        .unwrap();

    assert_eq!(aggregate.infrastructure(), &[cached][..]);
    assert!(aggregate.is_failed(&name("infrastructure")));
}

#[tokio::test]
async fn test_completion_order_does_not_change_the_aggregate() {
    let delays = [[5u64, 30, 15], [30, 5, 15], [15, 30, 5]];
    let mut seen = Vec::new();

    for delays in delays {
        let (registry, _) = registry(vec![
            ScriptedProvider::with_items("infrastructure", 2)
                .delayed(Duration::from_millis(delays[0])),
            ScriptedProvider::failing("urban", ProviderError::AuthFailed("401".to_string()))
                .delayed(Duration::from_millis(delays[1])),
            ScriptedProvider::with_items("notams", 1).delayed(Duration::from_millis(delays[2])),
        ]);
        let aggregate = AggregationSession::new(&registry, options(), None)
            .run(query())
            .await
            .unwrap();

        let shape: Vec<(String, usize, bool)> = aggregate
            .entries()
            .map(|(source, entry)| {
                (
                    source.to_string(),
                    entry.items.len(),
                    aggregate.is_failed(source),
                )
            })
            .collect();
        seen.push(shape);
    }

    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]), "{seen:?}");
}

#[tokio::test]
async fn test_static_sources_from_registry() {
    let (mut registry, _) = registry(vec![ScriptedProvider::with_items("urban", 1)]);
    registry
        .register(Arc::new(StaticSourceProvider::new(
            name("environmental"),
            vec![ContextRecord::new("wetland-3", "wetland")],
        )))
        .unwrap();

    let aggregate = ContextAggregator::new(registry, options())
        .aggregate(Coordinate::new(10.0, 10.0).unwrap(), 3.0)
        .await
        .unwrap();
    assert_eq!(aggregate.environmental()[0].id, "wetland-3");
    assert_eq!(aggregate.source_count(), 2);
}
