//! Query execution events.
//!
//! A [`QueryEvent`] describes one executed data-access operation: the exact
//! operation text used as the counting key, plus a [`QueryKind`] that
//! separates application data access from structural noise such as schema
//! introspection.

use serde::{Deserialize, Serialize};

/// Classification of an executed query.
///
/// Structural operations are emitted by infrastructure (schema inspection,
/// migrations bookkeeping) rather than application code. They routinely
/// repeat within a request and must never count toward repetition detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Application-level data access.
    Statement,
    /// Structural/meta operation, e.g. schema introspection.
    Schema,
}

impl QueryKind {
    /// Returns true if events of this kind are excluded from counting.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::Schema)
    }
}

/// One observed data-access execution.
///
/// Events are ephemeral: produced at the query call site, consumed
/// immediately by the tap observing the current request, never stored.
///
/// # Example
///
/// ```
/// use argus_core::{QueryEvent, QueryKind};
///
/// let event = QueryEvent::statement("SELECT * FROM users WHERE id = $1");
/// assert_eq!(event.kind, QueryKind::Statement);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvent {
    /// The exact operation text; the equality/hash key for counting.
    pub signature: String,
    /// Classification of the operation.
    pub kind: QueryKind,
}

impl QueryEvent {
    /// Creates an event with an explicit classification.
    #[must_use]
    pub fn new(signature: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            signature: signature.into(),
            kind,
        }
    }

    /// Creates an event for an application data-access statement.
    #[must_use]
    pub fn statement(signature: impl Into<String>) -> Self {
        Self::new(signature, QueryKind::Statement)
    }

    /// Creates an event for a schema/meta operation.
    #[must_use]
    pub fn schema(signature: impl Into<String>) -> Self {
        Self::new(signature, QueryKind::Schema)
    }
}
