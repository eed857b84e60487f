//! N+1 query inspection stage.
//!
//! This stage orchestrates one request's observation lifecycle:
//!
//! ```text
//! fresh log → tap installed → downstream handler → tap released
//!           → detect repetition → render banner → splice into body
//! ```
//!
//! The tap is scoped to the downstream call, so it is released on every
//! exit path - including handler failure, which propagates unchanged after
//! release. Detection is a fixed rule: any signature executed more than
//! once within the request. On a positive detection the response body
//! gains exactly one banner fragment ahead of its first `</body>`; status
//! and headers are never modified, except that a stale `Content-Length`
//! is dropped when the body was rewritten.
//!
//! # Example
//!
//! ```ignore
//! use argus_middleware::{Next, QueryInspectorMiddleware, RequestContext};
//!
//! let inspector = QueryInspectorMiddleware::new();
//! let mut ctx = RequestContext::new();
//! let response = inspector
//!     .process(&mut ctx, request, Next::handler(my_handler))
//!     .await?;
//! ```

use crate::context::RequestContext;
use crate::inject;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::render;
use crate::tap;
use crate::types::{Request, Response};
use argus_core::{ArgusError, ArgusResult, QueryLog};
use bytes::Bytes;
use http::header;
use http_body_util::{BodyExt, Full};
use parking_lot::Mutex;
use std::sync::Arc;

/// Summary of a positive detection.
///
/// Stored as a [`RequestContext`] extension so hosts and tests can inspect
/// what was found without parsing the injected HTML.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    entries: Vec<ReportEntry>,
}

/// One repeated signature and how often it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// The repeated operation text.
    pub signature: String,
    /// How many times it executed within the request.
    pub count: u64,
}

impl DetectionReport {
    fn from_log(log: &QueryLog) -> Self {
        Self {
            entries: log
                .repeated()
                .map(|(signature, count)| ReportEntry {
                    signature: signature.to_string(),
                    count,
                })
                .collect(),
        }
    }

    /// Repeated entries in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

/// Middleware that detects repeated queries within one request and splices
/// a visible warning into the HTML response.
///
/// The inspector holds no per-request state of its own: one long-lived
/// value serves any number of sequential or concurrent requests, each of
/// which gets a fresh log and its own tap scope.
#[derive(Debug, Clone, Default)]
pub struct QueryInspectorMiddleware;

impl QueryInspectorMiddleware {
    /// Creates a new inspector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Observes a single request end to end, with `handler` as the whole
    /// downstream application.
    ///
    /// Convenience for hosts without a longer chain; equivalent to
    /// [`process`](Middleware::process) with a fresh context and a
    /// terminal [`Next`]. Use `process` directly to inspect the
    /// [`DetectionReport`] afterwards.
    pub async fn handle<F>(&self, request: Request, handler: F) -> ArgusResult<Response>
    where
        F: FnOnce(&mut RequestContext, Request) -> BoxFuture<'static, ArgusResult<Response>>
            + Send,
    {
        let mut ctx = RequestContext::new();
        self.process(&mut ctx, request, Next::handler(handler)).await
    }
}

impl Middleware for QueryInspectorMiddleware {
    fn name(&self) -> &'static str {
        "query_inspector"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ArgusResult<Response>> {
        Box::pin(async move {
            let recorder = tap::recorder();

            // Sole suspension point. The scope releases the tap before the
            // result is inspected, on success and failure alike.
            let result = tap::observed(recorder.clone(), next.run(ctx, request)).await;

            // Handler failure propagates unchanged, after tap release.
            let response = result?;

            // The scope dropped its handle, so this is the last one unless
            // the handler smuggled the recorder somewhere it could still be
            // written - in which case counts can no longer be trusted.
            let log = Arc::try_unwrap(recorder)
                .map(Mutex::into_inner)
                .map_err(|_| {
                    ArgusError::observation("recorder handle outlived its observation scope")
                })?;

            if !log.has_repetition() {
                return Ok(response);
            }

            let report = DetectionReport::from_log(&log);
            tracing::warn!(
                request_id = %ctx.request_id(),
                repeated = report.entries().len(),
                "repeated queries detected within one request"
            );
            ctx.set_extension(report);

            let fragment = render::render_warning(&log);

            let (mut parts, body) = response.into_parts();
            let body_bytes = match BodyExt::collect(body).await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => Bytes::new(),
            };

            match inject::inject(&body_bytes, &fragment) {
                Some(rewritten) => {
                    // The body grew; a stale length header would truncate it.
                    parts.headers.remove(header::CONTENT_LENGTH);
                    Ok(Response::from_parts(parts, Full::new(rewritten)))
                }
                None => Ok(Response::from_parts(parts, Full::new(body_bytes))),
            }
        })
    }
}
