//! Per-request query aggregation.
//!
//! The [`QueryLog`] is the counting structure at the heart of detection:
//! a map from operation signature to occurrence count, scoped to exactly
//! one request. A fresh log is allocated when request handling starts and
//! discarded when it ends; no log is ever shared between requests.

use crate::event::QueryEvent;
use indexmap::IndexMap;
use serde::Serialize;

/// Signature-to-count aggregation for a single request.
///
/// Iteration order is first-seen, so rendered warnings are deterministic
/// for a given event sequence.
///
/// # Example
///
/// ```
/// use argus_core::{QueryEvent, QueryLog};
///
/// let mut log = QueryLog::new();
/// log.observe(&QueryEvent::statement("SELECT * FROM users"));
/// log.observe(&QueryEvent::statement("SELECT * FROM users"));
///
/// assert!(log.has_repetition());
/// assert_eq!(log.count("SELECT * FROM users"), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryLog {
    counts: IndexMap<String, u64>,
}

impl QueryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one executed query.
    ///
    /// Structural events (schema introspection and the like) never affect
    /// any count. Everything else increments the count for the event's
    /// signature, inserting the signature with count 1 if absent.
    pub fn observe(&mut self, event: &QueryEvent) {
        if event.kind.is_structural() {
            return;
        }
        *self.counts.entry(event.signature.clone()).or_insert(0) += 1;
    }

    /// Returns the occurrence count recorded for `signature`.
    #[must_use]
    pub fn count(&self, signature: &str) -> u64 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Number of distinct signatures recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no qualifying event has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The detection rule: true iff any signature ran more than once.
    #[must_use]
    pub fn has_repetition(&self) -> bool {
        self.counts.values().any(|&count| count > 1)
    }

    /// Entries with count > 1, in first-seen order.
    pub fn repeated(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(signature, &count)| (signature.as_str(), count))
    }

    /// One warning line per repeated signature, in first-seen order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.repeated()
            .map(|(signature, count)| {
                format!("N+1 query detected: {signature}, executed {count} times")
            })
            .collect()
    }
}
