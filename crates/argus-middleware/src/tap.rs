//! Task-local query event tap.
//!
//! The tap is how query events reach the request currently being observed.
//! Instead of a shared subscriber list (which would misattribute events
//! between concurrently in-flight requests), a task-local slot holds the
//! active request's recorder: [`observed`] installs it for exactly the
//! lifetime of one future, and [`publish`] routes each event to the
//! recorder of the task that published it.
//!
//! Installation is structural. The slot is released when the observed
//! future completes - on success, on error, and on panic alike - so a
//! request can never leak its registration into the next one.

use argus_core::{QueryEvent, QueryLog};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// Shared handle to the aggregation log of one request.
///
/// The mutex is uncontended by construction: only the owning task touches
/// the log while the tap is installed.
pub type RecorderHandle = Arc<Mutex<QueryLog>>;

tokio::task_local! {
    /// Recorder for the request currently observed on this task, if any.
    static ACTIVE_RECORDER: RecorderHandle;
}

/// Creates a fresh recorder handle for one request.
#[must_use]
pub fn recorder() -> RecorderHandle {
    Arc::new(Mutex::new(QueryLog::new()))
}

/// Runs `future` with `recorder` installed as this task's query recorder.
///
/// Events published on this task while `future` runs are recorded into
/// `recorder`; the slot is released when `future` completes, whatever the
/// outcome. Scopes may nest: the innermost recorder receives the events,
/// and the outer one is restored on exit.
pub async fn observed<F>(recorder: RecorderHandle, future: F) -> F::Output
where
    F: Future,
{
    ACTIVE_RECORDER.scope(recorder, future).await
}

/// Publishes a query event to the request observing the current task.
///
/// Structural events (schema introspection) never affect any count. When
/// no observation is active on this task - including tasks spawned by a
/// handler, which do not inherit the slot - the event is dropped.
pub fn publish(event: &QueryEvent) {
    let _ = ACTIVE_RECORDER.try_with(|recorder| recorder.lock().observe(event));
}
