//! Error types for Argus.
//!
//! Detection itself is infallible: an absent `</body>` marker is a silent
//! no-op, never an error, and the injected warning never carries failure
//! text. The errors here cover the two ways a request can actually fail
//! while being observed.

use thiserror::Error;

/// Result type alias using [`ArgusError`].
pub type ArgusResult<T> = Result<T, ArgusError>;

/// Errors surfaced while observing a request.
#[derive(Error, Debug)]
pub enum ArgusError {
    /// The downstream handler failed.
    ///
    /// Carried through unchanged after the event tap has been released;
    /// never retried, never swallowed.
    #[error("downstream handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Observation integrity could not be guaranteed for this request,
    /// e.g. a recorder handle outlived its observation scope.
    #[error("query observation failed: {0}")]
    Observation(String),
}

impl ArgusError {
    /// Wraps a downstream handler failure.
    #[must_use]
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Handler(err.into())
    }

    /// Builds an observation-integrity error.
    #[must_use]
    pub fn observation(message: impl Into<String>) -> Self {
        Self::Observation(message.into())
    }
}
