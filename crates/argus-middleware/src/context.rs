//! Per-request context.
//!
//! The [`RequestContext`] carries the request ID, timing, and typed
//! extension data through the middleware chain. Stages use extensions to
//! expose what they found - the query inspector stores its
//! [`DetectionReport`](crate::stages::inspector::DetectionReport) there
//! after a positive detection.

use argus_core::RequestId;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;

/// Context that flows through the middleware chain, one per request.
///
/// # Example
///
/// ```
/// use argus_middleware::context::RequestContext;
///
/// let mut ctx = RequestContext::new();
/// ctx.set_extension(42u64);
/// assert_eq!(ctx.get_extension::<u64>(), Some(&42));
/// ```
pub struct RequestContext {
    request_id: RequestId,
    started_at: Instant,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID, e.g. one propagated
    /// by the host.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns when this context was created.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since this context was created.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value, replacing any previous value of the
    /// same type.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value, if one was stored.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Checks whether an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("started_at", &self.started_at)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Finding {
        value: i32,
    }

    #[test]
    fn fresh_contexts_get_distinct_ids() {
        assert_ne!(
            RequestContext::new().request_id(),
            RequestContext::new().request_id()
        );
    }

    #[test]
    fn with_request_id_preserves_it() {
        let id = RequestId::new();
        let ctx = RequestContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn extensions_round_trip() {
        let mut ctx = RequestContext::new();
        assert!(!ctx.has_extension::<Finding>());

        ctx.set_extension(Finding { value: 7 });
        assert!(ctx.has_extension::<Finding>());
        assert_eq!(ctx.get_extension::<Finding>(), Some(&Finding { value: 7 }));

        assert_eq!(
            ctx.remove_extension::<Finding>(),
            Some(Finding { value: 7 })
        );
        assert!(!ctx.has_extension::<Finding>());
    }

    #[test]
    fn set_extension_replaces_previous_value() {
        let mut ctx = RequestContext::new();
        ctx.set_extension(Finding { value: 1 });
        ctx.set_extension(Finding { value: 2 });
        assert_eq!(ctx.get_extension::<Finding>(), Some(&Finding { value: 2 }));
    }

    #[test]
    fn elapsed_is_monotonic() {
        let ctx = RequestContext::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(ctx.elapsed() >= std::time::Duration::from_millis(5));
    }
}
