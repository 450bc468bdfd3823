//! Interception entry points.
//!
//! The weaving layer calls [`Interceptor::intercept`] (or
//! [`Interceptor::intercept_async`]) with the target instance, a delegate
//! running the original body, the call arguments, and the method metadata.
//! Per call:
//! - cache hit, or per-method resolution on the first call
//! - delegate timed with a monotonic clock
//! - `trace(duration, error_occurred, args)` reported exactly once
//! - delegate result, error, or panic handed back unchanged

mod guard;

use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

use svcmetric_core::{
    Arg, ConfigurationError, InterceptError, MethodMeta, MetricHandle, MetricRegistry,
};

use crate::cache::MethodMetricCache;
use crate::config::{InterceptorSection, InterceptorSettings};
use crate::resolver::MetricResolver;

use guard::TraceGuard;

/// Wraps instrumented method calls and reports them to their metric.
///
/// Construct once with the registry and share it (`Arc<Interceptor>`)
/// across every call site.
pub struct Interceptor {
    cache: MethodMetricCache,
    resolver: MetricResolver,
    settings: InterceptorSection,
}

impl Interceptor {
    pub fn new(registry: Arc<dyn MetricRegistry>) -> Self {
        Self::with_settings(registry, &InterceptorSettings::default())
    }

    pub fn with_settings(registry: Arc<dyn MetricRegistry>, settings: &InterceptorSettings) -> Self {
        Self {
            cache: MethodMetricCache::new(),
            resolver: MetricResolver::new(registry),
            settings: settings.interceptor.clone(),
        }
    }

    pub fn cache(&self) -> &MethodMetricCache {
        &self.cache
    }

    /// Run `proceed` once, timed and reported against the method's metric.
    ///
    /// A misconfigured method fails with [`InterceptError::Configuration`]
    /// before `proceed` runs. `Err(e)` from `proceed` comes back as
    /// [`InterceptError::Delegate`] holding the same `e`; a panic in
    /// `proceed` is reported as an error and then resumed.
    pub fn intercept<Tgt, T, E, F>(
        &self,
        _target: &Tgt,
        proceed: F,
        args: &[Arg<'_>],
        method: &MethodMeta,
    ) -> Result<T, InterceptError<E>>
    where
        Tgt: ?Sized,
        F: FnOnce() -> Result<T, E>,
    {
        let handle = self.handle_for::<Tgt>(method, args)?;

        let guard = TraceGuard::start(handle, method, args, &self.settings);
        let outcome = proceed();
        guard.complete(outcome.is_err());

        outcome.map_err(InterceptError::Delegate)
    }

    /// Async form of [`Interceptor::intercept`]; timing spans the whole await.
    ///
    /// Dropping the returned future before it completes reports the call as
    /// failed.
    pub async fn intercept_async<Tgt, T, E, F, Fut>(
        &self,
        _target: &Tgt,
        proceed: F,
        args: &[Arg<'_>],
        method: &MethodMeta,
    ) -> Result<T, InterceptError<E>>
    where
        Tgt: ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let handle = self.handle_for::<Tgt>(method, args)?;

        let guard = TraceGuard::start(handle, method, args, &self.settings);
        let outcome = proceed().await;
        guard.complete(outcome.is_err());

        outcome.map_err(InterceptError::Delegate)
    }

    fn handle_for<Tgt: ?Sized>(
        &self,
        method: &MethodMeta,
        args: &[Arg<'_>],
    ) -> Result<Arc<dyn MetricHandle>, ConfigurationError> {
        self.cache
            .get_or_resolve(method.id, || {
                tracing::debug!(method = %method.id, target = type_name::<Tgt>(), "metric cache miss");
                self.resolver.resolve(method, args)
            })
            .map_err(|e| {
                tracing::warn!(
                    method = %method.id,
                    target = type_name::<Tgt>(),
                    code = e.code().as_str(),
                    error = %e,
                    "metric resolution failed"
                );
                e
            })
    }
}
