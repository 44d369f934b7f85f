//! Scoped background tasks.
//!
//! Every recurring timer in the workspace is started through [`ScopedTask`].
//! The handle owns the tokio task: dropping it (or calling [`ScopedTask::cancel`])
//! aborts the task, so a timer can never outlive the component that started it.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{Instrument, debug};

use crate::logger::child_span;

pub struct ScopedTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl ScopedTask {
    /// Spawn `fut` on the current runtime, instrumented with a child span.
    pub fn spawn<F>(name: &'static str, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(fut.instrument(child_span(name)));
        debug!(task = name, "scoped task started");

        Self {
            name,
            handle: Some(handle),
        }
    }

    /// Run `on_tick` every `period`, first firing one full period after start
    /// (interval semantics, not "fire immediately"). Late ticks are skipped.
    pub fn every<F>(name: &'static str, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn(name, async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                on_tick();
            }
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True once the task has completed or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the task now. Equivalent to dropping the handle.
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = self.name, "scoped task cancelled");
        }
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.abort();
    }
}

impl std::fmt::Debug for ScopedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedTask")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}
