use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use svcmetric_core::{Arg, MethodMeta, MetricHandle};

use crate::config::{InterceptorSection, TraceFailurePolicy};

/// Times one delegate call and reports it to the handle when dropped.
///
/// Reporting happens in `Drop`, so it runs exactly once on return, on error,
/// on panic unwinding, and when an async caller drops the future. Until
/// [`TraceGuard::complete`] says otherwise the call counts as failed.
pub(crate) struct TraceGuard<'a> {
    handle: Arc<dyn MetricHandle>,
    method: &'a MethodMeta,
    args: &'a [Arg<'a>],
    policy: TraceFailurePolicy,
    slow_call_nanos: Option<u64>,
    failed: bool,
    started: Instant,
}

impl<'a> TraceGuard<'a> {
    /// Start the clock. Call immediately before running the delegate.
    pub(crate) fn start(
        handle: Arc<dyn MetricHandle>,
        method: &'a MethodMeta,
        args: &'a [Arg<'a>],
        settings: &InterceptorSection,
    ) -> Self {
        Self {
            handle,
            method,
            args,
            policy: settings.trace_failure,
            slow_call_nanos: settings.slow_call_threshold_nanos(),
            failed: true,
            started: Instant::now(),
        }
    }

    /// Record the delegate's outcome and report it.
    pub(crate) fn complete(mut self, failed: bool) {
        self.failed = failed;
    }
}

impl Drop for TraceGuard<'_> {
    fn drop(&mut self) {
        let elapsed = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let unwinding = thread::panicking();

        if let Some(threshold) = self.slow_call_nanos {
            if elapsed > threshold {
                tracing::warn!(
                    method = %self.method.id,
                    metric = self.method.metric_name().unwrap_or_default(),
                    elapsed_ms = elapsed / 1_000_000,
                    failed = self.failed,
                    "slow intercepted call"
                );
            }
        }

        let handle = &self.handle;
        let (failed, args) = (self.failed, self.args);
        let traced = panic::catch_unwind(AssertUnwindSafe(|| handle.trace(elapsed, failed, args)));

        if let Err(payload) = traced {
            tracing::error!(
                method = %self.method.id,
                metric = self.method.metric_name().unwrap_or_default(),
                policy = ?self.policy,
                "metric trace panicked"
            );
            // A second panic while unwinding would abort; the delegate's panic wins.
            if self.policy == TraceFailurePolicy::Propagate && !unwinding {
                panic::resume_unwind(payload);
            }
        }
    }
}
