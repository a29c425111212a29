//! Session lifecycle emission. Holds the bus and ingestor for one sink.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::TelemetryError;
use crate::telemetry::events::{SessionEndedData, SessionStartedData};
use crate::telemetry::routing::bus::ProgressBus;
use crate::telemetry::routing::ingestor::{EventIngestor, SharedIngestor};
use crate::telemetry::sinks::EventSink;

/// Runtime for session event emission. Cheap to clone; clones share one sink.
#[derive(Clone)]
pub struct TelemetryRuntime {
    bus: ProgressBus,
    ingestor: SharedIngestor,
}

impl TelemetryRuntime {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        let (bus, rx) = ProgressBus::new_pair();
        let ingestor = SharedIngestor::new(EventIngestor::new(sink, rx));
        Self { bus, ingestor }
    }

    pub fn start_session(&self, session_id: &str, data: &SessionStartedData) {
        self.emit_typed_best_effort(session_id, "session_started", data);
    }

    pub fn finish_session(&self, session_id: &str, data: &SessionEndedData) {
        self.emit_typed_best_effort(session_id, "session_ended", data);
        self.ingestor.close_session(session_id);
    }

    pub fn emit_event(
        &self,
        session_id: &str,
        event_type: &str,
        data: Value,
    ) -> Result<(), TelemetryError> {
        self.bus
            .emit(session_id.to_string(), event_type, data)
            .map_err(|_| TelemetryError::BusClosed)?;
        self.ingestor.drain()?;
        Ok(())
    }

    pub fn emit_event_best_effort(&self, session_id: &str, event_type: &str, data: Value) {
        if let Err(err) = self.emit_event(session_id, event_type, data) {
            warn!(
                session_id = %session_id,
                event_type = %event_type,
                error = %err,
                "failed to emit telemetry event"
            );
        }
    }

    pub fn emit_typed_best_effort<T: Serialize>(
        &self,
        session_id: &str,
        event_type: &str,
        data: &T,
    ) {
        match serde_json::to_value(data) {
            Ok(value) => self.emit_event_best_effort(session_id, event_type, value),
            Err(err) => warn!(
                session_id = %session_id,
                event_type = %event_type,
                error = %err,
                "failed to serialize telemetry payload"
            ),
        }
    }
}
