//! Method identity and metadata as handed over by the weaving layer.

use std::any::Any;
use std::fmt;

/// An opaque call argument, passed through to registry nodes and handles.
pub type Arg<'a> = &'a (dyn Any + Send + Sync);

/// Stable key for an instrumented method: declaring type plus signature.
///
/// Independent of the instance being called, so every instance of a type
/// shares one key per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodIdentity {
    pub declaring_type: &'static str,
    pub signature: &'static str,
}

impl MethodIdentity {
    pub const fn new(declaring_type: &'static str, signature: &'static str) -> Self {
        Self {
            declaring_type,
            signature,
        }
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.signature)
    }
}

/// Metric declaration attached to a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricMetadata {
    pub name: &'static str,
}

/// Everything the interceptor knows about the method being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodMeta {
    pub id: MethodIdentity,
    /// `None` when the method was instrumented without a metric declaration.
    pub metric: Option<MetricMetadata>,
}

impl MethodMeta {
    /// Method without a metric declaration.
    pub const fn new(id: MethodIdentity) -> Self {
        Self { id, metric: None }
    }

    /// Method declaring the metric `name`.
    pub const fn with_metric(id: MethodIdentity, name: &'static str) -> Self {
        Self {
            id,
            metric: Some(MetricMetadata { name }),
        }
    }

    pub fn metric_name(&self) -> Option<&'static str> {
        self.metric.map(|m| m.name)
    }
}
