//! Core middleware trait and chain types.
//!
//! A [`Middleware`] wraps the downstream handler: it may act before the
//! request goes down and after the response (or error) comes back up. The
//! [`Next`] value passed to each middleware is consumed by running it, so a
//! stage can continue the chain at most once.
//!
//! # Example
//!
//! ```ignore
//! use argus_middleware::{BoxFuture, Middleware, Next, Request, RequestContext, Response};
//! use argus_core::ArgusResult;
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut RequestContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, ArgusResult<Response>> {
//!         Box::pin(async move {
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?ctx.elapsed(), "request finished");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::context::RequestContext;
use crate::types::{Request, Response};
use argus_core::ArgusResult;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, the return type of middleware processing.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// # Invariants
///
/// - A middleware calls `next.run()` at most once (not at all when
///   short-circuiting).
/// - Downstream errors are passed through, not swallowed.
pub trait Middleware: Send + Sync + 'static {
    /// Unique name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request through this middleware.
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ArgusResult<Response>>;
}

/// The remainder of the chain after the current middleware.
///
/// Running it consumes it, continuing into the next middleware or, at the
/// end of the chain, the downstream handler.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(
        Box<
            dyn FnOnce(&mut RequestContext, Request) -> BoxFuture<'static, ArgusResult<Response>>
                + Send
                + 'a,
        >,
    ),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke `middleware`, then `next`.
    #[must_use]
    pub fn chain(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the downstream handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut RequestContext, Request) -> BoxFuture<'static, ArgusResult<Response>>
            + Send
            + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next middleware or handler in the chain.
    pub async fn run(self, ctx: &mut RequestContext, request: Request) -> ArgusResult<Response> {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;

    struct Marker {
        name: &'static str,
    }

    impl Middleware for Marker {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, ArgusResult<Response>> {
            Box::pin(async move {
                ctx.set_extension(format!("visited:{}", self.name));
                next.run(ctx, request).await
            })
        }
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| {
            Box::pin(async {
                Ok(HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .expect("static response"))
            })
        })
    }

    fn empty_request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .expect("static request")
    }

    #[tokio::test]
    async fn terminal_handler_runs() {
        let mut ctx = RequestContext::new();
        let response = ok_handler().run(&mut ctx, empty_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chain_reaches_handler_through_stages() {
        let first = Marker { name: "first" };
        let second = Marker { name: "second" };

        let mut ctx = RequestContext::new();
        let next = Next::chain(&first, Next::chain(&second, ok_handler()));

        let response = next.run(&mut ctx, empty_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.get_extension::<String>(), Some(&"visited:second".to_string()));
    }

    #[tokio::test]
    async fn handler_errors_pass_through() {
        let first = Marker { name: "first" };
        let next = Next::chain(
            &first,
            Next::handler(|_ctx, _req| {
                Box::pin(async {
                    Err(argus_core::ArgusError::handler(std::io::Error::other(
                        "boom",
                    )))
                })
            }),
        );

        let mut ctx = RequestContext::new();
        let err = next.run(&mut ctx, empty_request()).await.unwrap_err();
        assert!(err.to_string().contains("downstream handler failed"));
    }

    #[test]
    fn marker_name_is_stable() {
        let stage = Marker { name: "first" };
        assert_eq!(stage.name(), "first");
    }
}
