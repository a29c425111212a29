//! Per-source results and the composite aggregate.

use crate::aggregate::invocation::SettledInvocation;
use crate::types::{ContextRecord, GeoQuery, SourceKind, SourceName};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Normalized outcome of one provider call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceResult<T = ContextRecord> {
    Success { source: SourceName, items: Vec<T> },
    Failure { source: SourceName, error: String },
}

impl<T> SourceResult<T> {
    pub fn source(&self) -> &SourceName {
        match self {
            SourceResult::Success { source, .. } | SourceResult::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Success { .. })
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            SourceResult::Success { items, .. } => Some(items),
            SourceResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SourceResult::Success { .. } => None,
            SourceResult::Failure { error, .. } => Some(error),
        }
    }
}

/// One source's contribution to an aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    /// Provider records, or the provider's fallback if it failed
    pub items: Vec<ContextRecord>,
    pub duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Composite result of one completed session.
///
/// Built once, after every invocation settled, and never modified. Entries are
/// keyed by source name so completion order has no effect on contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextAggregate {
    session_id: String,
    query: GeoQuery,
    sources: BTreeMap<SourceName, SourceEntry>,
    failures: BTreeSet<SourceName>,
    completed_at: String,
}

impl ContextAggregate {
    pub(crate) fn assemble(
        session_id: String,
        query: GeoQuery,
        settled: Vec<SettledInvocation>,
        failures: BTreeSet<SourceName>,
    ) -> Self {
        let sources = settled
            .into_iter()
            .map(|invocation| {
                let duration_ms = invocation.elapsed.as_millis();
                let (source, entry) = match invocation.result {
                    SourceResult::Success { source, items } => (
                        source,
                        SourceEntry {
                            items,
                            duration_ms,
                            error: None,
                        },
                    ),
                    SourceResult::Failure { source, error } => (
                        source,
                        SourceEntry {
                            items: invocation.fallback,
                            duration_ms,
                            error: Some(error),
                        },
                    ),
                };
                (source, entry)
            })
            .collect();

        Self {
            session_id,
            query,
            sources,
            failures,
            completed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn query(&self) -> &GeoQuery {
        &self.query
    }

    pub fn completed_at(&self) -> &str {
        &self.completed_at
    }

    /// Records for a source; `None` if the source was not registered
    pub fn records(&self, source: &SourceName) -> Option<&[ContextRecord]> {
        self.sources.get(source).map(|entry| entry.items.as_slice())
    }

    /// Records for a well-known kind, empty if not registered
    pub fn kind(&self, kind: SourceKind) -> &[ContextRecord] {
        self.records(&SourceName::from(kind)).unwrap_or(&[])
    }

    pub fn infrastructure(&self) -> &[ContextRecord] {
        self.kind(SourceKind::Infrastructure)
    }

    pub fn airspace_restrictions(&self) -> &[ContextRecord] {
        self.kind(SourceKind::AirspaceRestrictions)
    }

    pub fn urban(&self) -> &[ContextRecord] {
        self.kind(SourceKind::Urban)
    }

    pub fn environmental(&self) -> &[ContextRecord] {
        self.kind(SourceKind::Environmental)
    }

    pub fn notams(&self) -> &[ContextRecord] {
        self.kind(SourceKind::Notams)
    }

    pub fn entry(&self, source: &SourceName) -> Option<&SourceEntry> {
        self.sources.get(source)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SourceName, &SourceEntry)> {
        self.sources.iter()
    }

    pub fn failures(&self) -> &BTreeSet<SourceName> {
        &self.failures
    }

    pub fn is_failed(&self, source: &SourceName) -> bool {
        self.failures.contains(source)
    }

    /// Sources that answered successfully, including with zero records
    pub fn present_count(&self) -> usize {
        self.sources
            .keys()
            .filter(|name| !self.failures.contains(*name))
            .count()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn total_items(&self) -> usize {
        self.sources.values().map(|entry| entry.items.len()).sum()
    }

    /// True when no source failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
