//! Property-based tests for completeness and order independence

use geoctx::aggregate::{AggregationSession, SessionOptions};
use geoctx::error::ProviderError;
use geoctx::provider::{ScriptedOutcome, ScriptedProvider, SourceRegistry};
use geoctx::types::{GeoQuery, SourceName};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// What one generated source does: item count (None = fails) and delay in ms
type Plan = (Option<usize>, u64);

fn plan() -> impl Strategy<Value = Plan> {
    (proptest::option::of(0usize..6), 0u64..8)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

fn options() -> SessionOptions {
    SessionOptions {
        source_timeout: Some(Duration::from_secs(2)),
        session_timeout: Some(Duration::from_secs(5)),
        cancel_grace: Duration::from_millis(20),
    }
}

fn build_registry(plans: &[Plan], panics: bool) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    for (i, (items, delay)) in plans.iter().enumerate() {
        let name = format!("source-{i}");
        let provider = match items {
            Some(count) => ScriptedProvider::with_items(name, *count),
            None if panics => {
                ScriptedProvider::new(name, ScriptedOutcome::Panic("boom".to_string()))
            }
            None => {
                ScriptedProvider::failing(name, ProviderError::RequestFailed("down".to_string()))
            }
        };
        registry
            .register(Arc::new(provider.delayed(Duration::from_millis(*delay))))
            .unwrap();
    }
    registry
}

/// Every registered source is either present or failed, never both, never neither
#[test]
fn test_every_source_is_accounted_for() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 64,
        ..Default::default()
    });
    let rt = runtime();

    runner
        .run(
            &(proptest::collection::vec(plan(), 1..6), any::<bool>()),
            |(plans, panics)| {
                let registry = build_registry(&plans, panics);
                let query = GeoQuery::from_degrees(12.0, 34.0, 5.0).unwrap();
                let aggregate = rt
                    .block_on(AggregationSession::new(&registry, options(), None).run(query))
                    .unwrap();

                prop_assert_eq!(aggregate.source_count(), plans.len());
                prop_assert_eq!(
                    aggregate.present_count() + aggregate.failures().len(),
                    plans.len()
                );

                let expected_failures: BTreeSet<SourceName> = plans
                    .iter()
                    .enumerate()
                    .filter(|(_, (items, _))| items.is_none())
                    .map(|(i, _)| SourceName::new(format!("source-{i}")).unwrap())
                    .collect();
                prop_assert_eq!(aggregate.failures(), &expected_failures);

                for (i, (items, _)) in plans.iter().enumerate() {
                    let name = SourceName::new(format!("source-{i}")).unwrap();
                    let expected = items.unwrap_or(0);
                    prop_assert_eq!(aggregate.records(&name).map(|r| r.len()), Some(expected));
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Reversing registration order and delays leaves the aggregate contents unchanged
#[test]
fn test_contents_independent_of_completion_order() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 32,
        ..Default::default()
    });
    let rt = runtime();

    runner
        .run(&proptest::collection::vec(plan(), 2..6), |plans| {
            let query = GeoQuery::from_degrees(-5.0, 100.0, 2.0).unwrap();

            let forward = build_registry(&plans, false);
            let mut reversed_plans: Vec<Plan> = plans.clone();
            let max_delay = plans.iter().map(|(_, d)| *d).max().unwrap_or(0);
            for plan in reversed_plans.iter_mut() {
                plan.1 = max_delay - plan.1;
            }
            let reversed = build_registry(&reversed_plans, false);

            let a = rt
                .block_on(AggregationSession::new(&forward, options(), None).run(query))
                .unwrap();
            let b = rt
                .block_on(AggregationSession::new(&reversed, options(), None).run(query))
                .unwrap();

            let shape = |agg: &geoctx::ContextAggregate| {
                agg.entries()
                    .map(|(source, entry)| {
                        (
                            source.clone(),
                            entry.items.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
                            entry.error.is_some(),
                        )
                    })
                    .collect::<Vec<_>>()
            };
            prop_assert_eq!(shape(&a), shape(&b));
            prop_assert_eq!(a.failures(), b.failures());
            Ok(())
        })
        .unwrap();
}
