use std::sync::Arc;

use svcmetric_core::{Arg, ConfigurationError, MethodMeta, MetricHandle, MetricRegistry, Result};

/// Binds a method's declared metric name to a handle from the registry.
///
/// Stateless apart from the injected registry; memoization lives in
/// [`crate::cache::MethodMetricCache`].
#[derive(Clone)]
pub struct MetricResolver {
    registry: Arc<dyn MetricRegistry>,
}

impl MetricResolver {
    pub fn new(registry: Arc<dyn MetricRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, method: &MethodMeta, args: &[Arg<'_>]) -> Result<Arc<dyn MetricHandle>> {
        let metadata = method
            .metric
            .ok_or(ConfigurationError::MissingMetadata { method: method.id })?;

        let node = self
            .registry
            .lookup(metadata.name)
            .ok_or_else(|| ConfigurationError::UnknownMetric {
                name: metadata.name.to_string(),
            })?;

        tracing::debug!(method = %method.id, metric = metadata.name, "metric resolved");
        Ok(node.metric(method, args))
    }
}
