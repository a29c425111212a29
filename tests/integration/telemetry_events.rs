//! Integration tests for session telemetry

use super::test_utils::{options, query, registry};
use geoctx::aggregate::AggregationSession;
use geoctx::error::ProviderError;
use geoctx::provider::{ScriptedOutcome, ScriptedProvider};
use geoctx::telemetry::{MemorySink, TelemetryRuntime};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_completed_session_event_stream() {
    let sink = Arc::new(MemorySink::new());
    let (registry, _) = registry(vec![
        ScriptedProvider::with_items("urban", 2),
        ScriptedProvider::failing("notams", ProviderError::Decode("bad json".to_string())),
    ]);
    let mut session =
        AggregationSession::new(&registry, options(), Some(TelemetryRuntime::new(sink.clone())));
    session.run(query()).await.unwrap();

    let events = sink.events_for(session.id());
    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types.first(), Some(&"session_started"));
    assert_eq!(types.last(), Some(&"session_ended"));
    assert_eq!(types.iter().filter(|t| **t == "source_settled").count(), 2);

    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]), "sequence numbers increase: {seqs:?}");

    let failed = events
        .iter()
        .find(|e| e.event_type == "source_settled" && e.data["source"] == "notams")
        .unwrap();
    assert_eq!(failed.data["ok"], false);
    assert!(failed.data["error"].as_str().unwrap().contains("bad json"));

    let ended = events.last().unwrap();
    assert_eq!(ended.data["status"], "completed");
    assert_eq!(ended.data["failed"][0], "notams");
}

#[tokio::test]
async fn test_cancelled_session_reports_status() {
    let sink = Arc::new(MemorySink::new());
    let (registry, _) = registry(vec![ScriptedProvider::new("urban", ScriptedOutcome::Hang)]);
    let mut session =
        AggregationSession::new(&registry, options(), Some(TelemetryRuntime::new(sink.clone())));
    let cancel = session.canceller();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();
    });
    assert!(session.run(query()).await.is_err());

    let ended = sink.events_for(session.id()).pop().unwrap();
    assert_eq!(ended.event_type, "session_ended");
    assert_eq!(ended.data["status"], "cancelled");
    assert_eq!(ended.data["error"], "cancelled by caller");
}
