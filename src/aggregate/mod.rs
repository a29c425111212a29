//! Resilient multi-source aggregation.
//!
//! One [`AggregationSession`] per request: every registered provider runs as an
//! isolated task, the session waits for all of them, and the outcome is a
//! [`ContextAggregate`] plus the set of sources that failed.

pub mod aggregator;
pub mod invocation;
pub mod ledger;
pub mod result;
pub mod session;

pub use aggregator::ContextAggregator;
pub use invocation::{invoke_isolated, InvocationOutcome, SettledInvocation};
pub use ledger::FailureLedger;
pub use result::{ContextAggregate, SourceEntry, SourceResult};
pub use session::{AggregationSession, SessionOptions, SessionProgress, SessionState};
