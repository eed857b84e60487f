//! Middleware stages.
//!
//! Argus ships a single stage: the [`inspector`], which observes query
//! events for the duration of one request and annotates the response when
//! it finds repetition.

pub mod inspector;

pub use inspector::QueryInspectorMiddleware;
