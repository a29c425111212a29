//! Event ingestion and sequence assignment.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TelemetryError;
use crate::telemetry::events::{ProgressEnvelope, ProgressEvent};
use crate::telemetry::sinks::EventSink;

pub struct EventIngestor {
    sink: Arc<dyn EventSink>,
    receiver: Receiver<ProgressEnvelope>,
    next_seq: HashMap<String, u64>,
}

impl EventIngestor {
    pub fn new(sink: Arc<dyn EventSink>, receiver: Receiver<ProgressEnvelope>) -> Self {
        Self {
            sink,
            receiver,
            next_seq: HashMap::new(),
        }
    }

    pub fn ingest_pending(&mut self) -> Result<usize, TelemetryError> {
        let mut count = 0usize;
        while let Ok(envelope) = self.receiver.try_recv() {
            self.ingest_one(envelope)?;
            count += 1;
        }
        Ok(count)
    }

    /// Forget the sequence counter of a finished session
    pub fn close_session(&mut self, session: &str) {
        self.next_seq.remove(session);
    }

    fn ingest_one(&mut self, envelope: ProgressEnvelope) -> Result<(), TelemetryError> {
        let seq = self.next_seq.entry(envelope.session.clone()).or_insert(1);
        let event = ProgressEvent::from_envelope(envelope, *seq);
        *seq += 1;
        self.sink.record(event)
    }
}

#[derive(Clone)]
pub struct SharedIngestor(Arc<Mutex<EventIngestor>>);

impl SharedIngestor {
    pub fn new(inner: EventIngestor) -> Self {
        Self(Arc::new(Mutex::new(inner)))
    }

    pub fn drain(&self) -> Result<usize, TelemetryError> {
        self.0.lock().ingest_pending()
    }

    pub fn close_session(&self, session: &str) {
        self.0.lock().close_session(session);
    }
}
