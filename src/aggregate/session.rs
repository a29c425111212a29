//! Aggregation session: one single-use run over every registered provider.
//!
//! Lifecycle: `Created -> Running -> Settled -> Completed`, or
//! `Created -> Running -> Cancelled` when the caller cancels or the session
//! timeout expires first. A join failure that is not attributable to a
//! provider ends the session in `Failed`.
//!
//! The session is the only writer of its [`FailureLedger`]: invocations run as
//! independent tasks and hand their results back through the join set, and
//! the collector loop below records failures as results arrive.

use crate::aggregate::invocation::{invoke_isolated, InvocationOutcome, SettledInvocation};
use crate::aggregate::ledger::FailureLedger;
use crate::aggregate::result::ContextAggregate;
use crate::error::{AggregateError, CancelReason};
use crate::provider::{SourceProvider, SourceRegistry};
use crate::telemetry::{
    new_session_id, SessionEndedData, SessionStartedData, SessionStatus, SourceAbandonedData,
    SourceSettledData, TelemetryRuntime,
};
use crate::types::{GeoQuery, SourceName};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    Running,
    Settled,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Created => "created",
            SessionState::Running => "running",
            SessionState::Settled => "settled",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        }
    }
}

/// Snapshot published to subscribers while the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub state: SessionState,
    pub total: usize,
    pub settled: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound on each provider call, on top of the provider's own timeout
    pub source_timeout: Option<Duration>,
    /// Overall bound on the session; expiry behaves like caller cancellation
    pub session_timeout: Option<Duration>,
    /// How long cancelled invocations get to wind down before being aborted
    pub cancel_grace: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            source_timeout: Some(Duration::from_secs(15)),
            session_timeout: Some(Duration::from_secs(30)),
            cancel_grace: Duration::from_millis(250),
        }
    }
}

pub struct AggregationSession {
    id: String,
    providers: Vec<Arc<dyn SourceProvider>>,
    options: SessionOptions,
    telemetry: Option<TelemetryRuntime>,
    cancel: CancellationToken,
    progress: watch::Sender<SessionProgress>,
    ledger: FailureLedger,
    #[cfg(test)]
    abort_on_spawn: Option<SourceName>,
}

impl AggregationSession {
    pub fn new(
        registry: &SourceRegistry,
        options: SessionOptions,
        telemetry: Option<TelemetryRuntime>,
    ) -> Self {
        let providers = registry.providers().to_vec();
        let (progress, _) = watch::channel(SessionProgress {
            state: SessionState::Created,
            total: providers.len(),
            settled: 0,
            failed: 0,
        });
        Self {
            id: new_session_id(),
            providers,
            options,
            telemetry,
            cancel: CancellationToken::new(),
            progress,
            ledger: FailureLedger::new(),
            #[cfg(test)]
            abort_on_spawn: None,
        }
    }

    /// Cancel this session whenever `parent` is cancelled
    pub fn linked_to(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.progress.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionProgress> {
        self.progress.subscribe()
    }

    /// Sources recorded as failed so far, including stragglers abandoned
    /// during cancellation
    pub fn failures(&self) -> BTreeSet<SourceName> {
        self.ledger.snapshot()
    }

    /// Token that cancels this session when fired
    pub fn canceller(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every provider against `query` and wait for all of them.
    ///
    /// Returns the aggregate only if every invocation settled. Provider
    /// failures are absorbed into the aggregate's failure set; cancellation,
    /// session timeout and join failures are returned as errors.
    pub async fn run(&mut self, query: GeoQuery) -> Result<ContextAggregate, AggregateError> {
        let state = self.state();
        if state != SessionState::Created {
            return Err(AggregateError::SessionReused(state.as_str().to_string()));
        }
        if self.providers.is_empty() {
            return Err(AggregateError::NoProviders);
        }

        let total = self.providers.len();
        let started = Instant::now();
        self.set_state(SessionState::Running);
        info!(
            session_id = %self.id,
            lat = query.center().lat,
            lon = query.center().lon,
            radius_km = query.radius_km(),
            sources = total,
            "Aggregation session started"
        );
        if let Some(telemetry) = &self.telemetry {
            telemetry.start_session(
                &self.id,
                &SessionStartedData {
                    lat: query.center().lat,
                    lon: query.center().lon,
                    radius_km: query.radius_km(),
                    sources: self
                        .providers
                        .iter()
                        .map(|p| p.name().to_string())
                        .collect(),
                },
            );
        }

        let mut tasks = JoinSet::new();
        for provider in &self.providers {
            let handle = tasks.spawn(invoke_isolated(
                provider.clone(),
                query,
                self.options.source_timeout,
                self.cancel.child_token(),
            ));
            if self.aborts_on_spawn(provider.name()) {
                handle.abort();
            }
        }

        let cancel = self.cancel.clone();
        let session_timeout = self.options.session_timeout;
        let deadline = async move {
            match session_timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut settled: Vec<SettledInvocation> = Vec::with_capacity(total);
        let mut resolved: BTreeSet<SourceName> = BTreeSet::new();
        let mut stop: Option<Result<CancelReason, String>> = None;

        while settled.len() < total {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stop = Some(Ok(CancelReason::Caller));
                    break;
                }
                _ = &mut deadline => {
                    stop = Some(Ok(CancelReason::Deadline));
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(InvocationOutcome::Settled(invocation))) => {
                        resolved.insert(invocation.source().clone());
                        self.collect(&invocation);
                        settled.push(invocation);
                    }
                    Some(Ok(InvocationOutcome::Cancelled { source })) => {
                        // Only reachable once the session token fired; the next
                        // iteration takes the cancellation branch.
                        resolved.insert(source);
                    }
                    Some(Err(join_err)) => {
                        stop = Some(Err(join_err.to_string()));
                        break;
                    }
                    None => {
                        stop = Some(Err(format!(
                            "join set drained with {} of {} invocations settled",
                            settled.len(),
                            total
                        )));
                        break;
                    }
                },
            }
        }

        match stop {
            None => Ok(self.complete(query, settled, started)),
            Some(Ok(reason)) => {
                self.teardown(tasks, &resolved).await;
                self.finish(SessionState::Cancelled, started, Some(reason.to_string()));
                info!(session_id = %self.id, reason = %reason, "Aggregation session cancelled");
                Err(AggregateError::Cancelled(reason))
            }
            Some(Err(message)) => {
                self.cancel.cancel();
                tasks.abort_all();
                self.finish(SessionState::Failed, started, Some(message.clone()));
                error!(session_id = %self.id, error = %message, "Aggregation session failed");
                Err(AggregateError::Systemic(message))
            }
        }
    }

    fn collect(&mut self, invocation: &SettledInvocation) {
        let source = invocation.source().clone();
        let ok = invocation.result.is_success();
        if !ok {
            self.ledger.record(source.clone());
        }
        let failed = self.ledger.len();
        self.progress.send_modify(|progress| {
            progress.settled += 1;
            progress.failed = failed;
        });

        if let Some(telemetry) = &self.telemetry {
            telemetry.emit_typed_best_effort(
                &self.id,
                "source_settled",
                &SourceSettledData {
                    source: source.to_string(),
                    ok,
                    items: invocation.result.items().map_or(0, |items| items.len()),
                    duration_ms: invocation.elapsed.as_millis(),
                    error: invocation.result.error().map(str::to_string),
                },
            );
        }
    }

    fn complete(
        &mut self,
        query: GeoQuery,
        settled: Vec<SettledInvocation>,
        started: Instant,
    ) -> ContextAggregate {
        self.set_state(SessionState::Settled);
        // Ledger snapshot and assembly happen together with no suspension point between.
        let failures = self.ledger.snapshot();
        let aggregate = ContextAggregate::assemble(self.id.clone(), query, settled, failures);
        debug_assert_eq!(
            aggregate.present_count() + aggregate.failures().len(),
            self.providers.len()
        );

        self.finish(SessionState::Completed, started, None);
        info!(
            session_id = %self.id,
            present = aggregate.present_count(),
            failed = aggregate.failures().len(),
            items = aggregate.total_items(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Aggregation session completed"
        );
        aggregate
    }

    /// Signal every in-flight invocation, give them `cancel_grace` to wind
    /// down, then abort whatever is left. Stragglers are recorded as failed.
    async fn teardown(
        &mut self,
        mut tasks: JoinSet<InvocationOutcome>,
        resolved: &BTreeSet<SourceName>,
    ) {
        self.cancel.cancel();
        let mut responded = resolved.clone();

        let grace = tokio::time::sleep(self.options.cancel_grace);
        tokio::pin!(grace);
        loop {
            tokio::select! {
                _ = &mut grace => break,
                joined = tasks.join_next() => match joined {
                    Some(Ok(outcome)) => {
                        responded.insert(outcome.source().clone());
                    }
                    Some(Err(join_err)) => {
                        debug!(
                            session_id = %self.id,
                            error = %join_err,
                            "Invocation ended abnormally during teardown"
                        );
                    }
                    None => break,
                },
            }
        }
        tasks.abort_all();

        let abandoned: Vec<SourceName> = self
            .providers
            .iter()
            .map(|provider| provider.name().clone())
            .filter(|name| !responded.contains(name))
            .collect();
        for source in abandoned {
            warn!(
                session_id = %self.id,
                source = %source,
                grace_ms = self.options.cancel_grace.as_millis() as u64,
                "Source ignored cancellation; recording as failed"
            );
            self.ledger.record(source.clone());
            if let Some(telemetry) = &self.telemetry {
                telemetry.emit_typed_best_effort(
                    &self.id,
                    "source_abandoned",
                    &SourceAbandonedData {
                        source: source.to_string(),
                        grace_ms: self.options.cancel_grace.as_millis(),
                    },
                );
            }
        }
        let failed = self.ledger.len();
        self.progress.send_modify(|progress| progress.failed = failed);
    }

    fn finish(&mut self, state: SessionState, started: Instant, error: Option<String>) {
        self.set_state(state);
        if let Some(telemetry) = &self.telemetry {
            let status = match state {
                SessionState::Completed => SessionStatus::Completed,
                SessionState::Cancelled => SessionStatus::Cancelled,
                _ => SessionStatus::Failed,
            };
            telemetry.finish_session(
                &self.id,
                &SessionEndedData {
                    status: status.as_str().to_string(),
                    duration_ms: started.elapsed().as_millis(),
                    failed: self.ledger.snapshot().iter().map(|s| s.to_string()).collect(),
                    error,
                },
            );
        }
    }

    #[cfg(test)]
    fn aborts_on_spawn(&self, source: &SourceName) -> bool {
        self.abort_on_spawn.as_ref() == Some(source)
    }

    #[cfg(not(test))]
    fn aborts_on_spawn(&self, _source: &SourceName) -> bool {
        false
    }

    fn set_state(&self, state: SessionState) {
        debug!(session_id = %self.id, state = state.as_str(), "Session state change");
        self.progress.send_modify(|progress| progress.state = state);
    }
}
