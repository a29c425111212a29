//! Failure ledger: which sources failed during one session.

use crate::types::SourceName;
use std::collections::BTreeSet;

/// Append-only set of failed source names.
///
/// Owned by exactly one session. Invocations never write to it; they hand
/// their results to the session, which records failures as it collects them.
#[derive(Debug, Default)]
pub struct FailureLedger {
    failed: BTreeSet<SourceName>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Returns `false` if the source was already recorded.
    pub fn record(&mut self, source: SourceName) -> bool {
        self.failed.insert(source)
    }

    pub fn contains(&self, source: &SourceName) -> bool {
        self.failed.contains(source)
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> BTreeSet<SourceName> {
        self.failed.clone()
    }
}
