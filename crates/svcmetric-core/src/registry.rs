//! Registry-side contracts.
//!
//! Implemented by whatever owns metrics (see `svcmetric_instrument::tree` for
//! an in-process one). The interceptor only ever holds `Arc`s to handles.

use std::sync::Arc;

use crate::method::{Arg, MethodMeta};

/// Accepts timing/outcome reports for one logical metric.
///
/// Called concurrently from every thread running an instrumented method;
/// implementations synchronize internally.
pub trait MetricHandle: Send + Sync {
    fn trace(&self, duration_nanos: u64, error_occurred: bool, args: &[Arg<'_>]);
}

/// A registry entry able to materialize a handle for a method call.
pub trait MetricNode: Send + Sync {
    /// Handle bound to `method` and `args`.
    ///
    /// Must be idempotent: the same method yields a content-equivalent
    /// handle every time, since first-use resolution may race.
    fn metric(&self, method: &MethodMeta, args: &[Arg<'_>]) -> Arc<dyn MetricHandle>;
}

/// Name → node lookup. Expected to be populated before interception starts.
pub trait MetricRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn MetricNode>>;
}
