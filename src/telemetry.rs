//! Telemetry domain: events, sessions, routing, and sinks.
//!
//! Emission is best-effort. A failing or missing sink is logged and never
//! affects the aggregation that produced the event.

mod types;

pub mod events;
pub mod routing;
pub mod sessions;
pub mod sinks;

pub use events::{
    ProgressEnvelope, ProgressEvent, SessionEndedData, SessionStartedData, SourceAbandonedData,
    SourceSettledData,
};
pub use sessions::policy::SessionStatus;
pub use sessions::TelemetryRuntime;
pub use sinks::{EventSink, MemorySink, TracingSink};
pub use types::{new_session_id, now_millis};
