//! Telemetry sinks: where sequenced events end up.

use parking_lot::Mutex;
use tracing::info;

use crate::error::TelemetryError;
use crate::telemetry::events::ProgressEvent;

/// Destination for sequenced telemetry events.
///
/// `record` is called synchronously on the emitting task and must return
/// quickly; slow sinks should buffer internally.
pub trait EventSink: Send + Sync {
    fn record(&self, event: ProgressEvent) -> Result<(), TelemetryError>;
}

/// Keeps every event in memory, for tests and embedding callers.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_for(&self, session: &str) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.session == session)
            .cloned()
            .collect()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: ProgressEvent) -> Result<(), TelemetryError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Forwards events to the `tracing` subscriber under the `geoctx::telemetry` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: ProgressEvent) -> Result<(), TelemetryError> {
        info!(
            target: "geoctx::telemetry",
            session = %event.session,
            seq = event.seq,
            event_type = %event.event_type,
            data = %event.data,
            "telemetry event"
        );
        Ok(())
    }
}
