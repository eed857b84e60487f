//! Common types used throughout the middleware chain.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type processed by the chain.
///
/// A standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by the chain: status, headers, body.
pub type Response = http::Response<Full<Bytes>>;
