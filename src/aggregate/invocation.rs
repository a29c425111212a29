//! Isolated invocation of a single provider.
//!
//! Whatever the provider does (returns an error, panics, overruns its time
//! budget), the outcome leaves this boundary as a value. The only
//! non-settled outcome is cancellation, which the session never folds into
//! an aggregate.

use crate::aggregate::result::SourceResult;
use crate::error::ProviderError;
use crate::provider::SourceProvider;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A provider call that ran to completion, successfully or not
#[derive(Debug, Clone)]
pub struct SettledInvocation {
    pub result: SourceResult,
    /// Provider fallback; populated only when `result` is a failure
    pub fallback: Vec<ContextRecord>,
    pub elapsed: Duration,
}

impl SettledInvocation {
    pub fn source(&self) -> &SourceName {
        self.result.source()
    }
}

#[derive(Debug, Clone)]
pub enum InvocationOutcome {
    Settled(SettledInvocation),
    /// The call was dropped because the session was cancelled
    Cancelled { source: SourceName },
}

impl InvocationOutcome {
    pub fn source(&self) -> &SourceName {
        match self {
            InvocationOutcome::Settled(settled) => settled.source(),
            InvocationOutcome::Cancelled { source } => source,
        }
    }
}

/// Run exactly one `fetch` and normalize its outcome.
///
/// `source_timeout` bounds the call on top of the provider's own timeout.
pub async fn invoke_isolated(
    provider: Arc<dyn SourceProvider>,
    query: GeoQuery,
    source_timeout: Option<Duration>,
    cancel: CancellationToken,
) -> InvocationOutcome {
    let source = provider.name().clone();
    let started = Instant::now();

    let call = AssertUnwindSafe(provider.fetch(&query)).catch_unwind();
    let bounded = async {
        match source_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| limit),
            None => Ok(call.await),
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(source = %source, "Invocation cancelled");
            return InvocationOutcome::Cancelled { source };
        }
        outcome = bounded => outcome,
    };

    let error = match outcome {
        Ok(Ok(Ok(items))) => {
            let elapsed = started.elapsed();
            debug!(
                source = %source,
                items = items.len(),
                duration_ms = elapsed.as_millis() as u64,
                "Source settled"
            );
            return InvocationOutcome::Settled(SettledInvocation {
                result: SourceResult::Success { source, items },
                fallback: Vec::new(),
                elapsed,
            });
        }
        Ok(Ok(Err(err))) => err,
        Ok(Err(panic)) => ProviderError::Panicked(panic_message(panic.as_ref())),
        Err(limit) => ProviderError::Timeout(limit.as_millis()),
    };

    let elapsed = started.elapsed();
    warn!(
        source = %source,
        error = %error,
        duration_ms = elapsed.as_millis() as u64,
        "Source failed; substituting fallback"
    );
    InvocationOutcome::Settled(SettledInvocation {
        fallback: guarded_fallback(provider.as_ref(), &source),
        result: SourceResult::Failure {
            source,
            error: error.to_string(),
        },
        elapsed,
    })
}

/// The fallback is provider code too; a panic there yields no records.
fn guarded_fallback(provider: &dyn SourceProvider, source: &SourceName) -> Vec<ContextRecord> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| provider.fallback())) {
        Ok(records) => records,
        Err(panic) => {
            warn!(
                source = %source,
                error = %panic_message(panic.as_ref()),
                "Fallback panicked; contributing no records"
            );
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
