//! # Argus Middleware
//!
//! Request-scoped N+1 query detection for HTTP services, as a middleware
//! stage. A development-time aid, not a production control.
//!
//! While one request is being handled, Argus observes every data-access
//! operation the application reports via [`tap::publish`], counts
//! occurrences per operation signature, and - when any signature executed
//! more than once - splices a visible warning banner into the HTML
//! response ahead of its first `</body>`.
//!
//! ## Per-request flow
//!
//! ```text
//! Request → QueryInspector ┬ install tap (task-local, scoped)
//!                          ├ downstream handler   ← tap::publish(event)
//!                          ├ release tap (every exit path)
//!                          ├ detect: any signature count > 1?
//!                          └ yes: render banner, splice before </body>
//! Response (possibly annotated)
//! ```
//!
//! ## Key properties
//!
//! - **Request-scoped**: each request gets a fresh log; the task-local tap
//!   keeps concurrent requests from contaminating each other's counts.
//! - **Structural release**: the tap is installed for exactly the lifetime
//!   of the downstream call; handler failures propagate after release.
//! - **Conservative rewriting**: a body with no `</body>` marker is
//!   returned unchanged; status and headers are never modified (a stale
//!   `Content-Length` is dropped when the body was rewritten).
//!
//! ## Example
//!
//! ```ignore
//! use argus_core::QueryEvent;
//! use argus_middleware::{tap, Next, QueryInspectorMiddleware, RequestContext};
//!
//! // At the data-access layer:
//! tap::publish(&QueryEvent::statement(sql));
//!
//! // Around the handler:
//! let inspector = QueryInspectorMiddleware::new();
//! let mut ctx = RequestContext::new();
//! let response = inspector.process(&mut ctx, request, Next::handler(handler)).await?;
//! ```

#![doc(html_root_url = "https://docs.rs/argus-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod inject;
pub mod middleware;
pub mod render;
pub mod stages;
pub mod tap;
pub mod types;

// Re-export main types at crate root
pub use context::RequestContext;
pub use middleware::{BoxFuture, Middleware, Next};
pub use stages::inspector::{DetectionReport, QueryInspectorMiddleware, ReportEntry};
pub use types::{Request, Response};
