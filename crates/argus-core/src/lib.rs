//! # Argus Core
//!
//! Transport-independent vocabulary for the Argus query diagnostics
//! middleware:
//!
//! - [`QueryEvent`] / [`QueryKind`] - one observed data-access execution
//! - [`QueryLog`] - per-request signature-to-count aggregation and the
//!   repetition rule
//! - [`RequestId`] - UUID v7 request identifier for log correlation
//! - [`ArgusError`] - standard error types

#![doc(html_root_url = "https://docs.rs/argus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod event;
mod id;
mod log;

pub use error::{ArgusError, ArgusResult};
pub use event::{QueryEvent, QueryKind};
pub use id::RequestId;
pub use log::QueryLog;
