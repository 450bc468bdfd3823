//! svcmetric interception engine.
//!
//! Wires the method metric cache, the registry-backed resolver, and the
//! timing interceptor into the single entry point the weaving layer calls.
//! Also ships `MetricTree`, an in-process registry usable in tests and in
//! processes without an external metrics backend.

pub mod cache;
pub mod config;
pub mod interceptor;
pub mod resolver;
pub mod tree;

pub use cache::MethodMetricCache;
pub use interceptor::Interceptor;
pub use resolver::MetricResolver;
pub use tree::{MetricTree, ServiceMetric, ServiceMetricSnapshot};
