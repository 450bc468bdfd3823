//! In-process metric registry.
//!
//! `MetricTree` maps metric names to nodes, each owning one
//! [`ServiceMetric`]. Every method bound to the same name shares that metric,
//! which keeps resolution idempotent. Register names up front, before the
//! interceptor sees traffic.

pub mod service_metric;

use std::fmt::Write;
use std::sync::Arc;

use dashmap::DashMap;
use svcmetric_core::{Arg, MethodMeta, MetricHandle, MetricNode, MetricRegistry};

pub use service_metric::{ServiceMetric, ServiceMetricSnapshot, BUCKETS_MICROS};

const DURATION_FAMILY: &str = "svcmetric_call_duration_micros";
const ERRORS_FAMILY: &str = "svcmetric_call_errors_total";

/// Registry node for one metric name.
pub struct TreeNode {
    metric: Arc<ServiceMetric>,
}

impl TreeNode {
    pub fn service_metric(&self) -> Arc<ServiceMetric> {
        Arc::clone(&self.metric)
    }
}

impl MetricNode for TreeNode {
    fn metric(&self, _method: &MethodMeta, _args: &[Arg<'_>]) -> Arc<dyn MetricHandle> {
        self.metric.clone()
    }
}

#[derive(Default)]
pub struct MetricTree {
    nodes: DashMap<String, Arc<TreeNode>>,
}

impl MetricTree {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }

    /// Register `name`, or return the existing node.
    pub fn register(&self, name: &str) -> Arc<TreeNode> {
        self.nodes
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(metric = name, "metric registered");
                Arc::new(TreeNode {
                    metric: Arc::new(ServiceMetric::new(name)),
                })
            })
            .value()
            .clone()
    }

    pub fn node(&self, name: &str) -> Option<Arc<TreeNode>> {
        self.nodes.get(name).map(|r| r.value().clone())
    }

    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Snapshots of every registered metric, sorted by name.
    pub fn snapshots(&self) -> Vec<ServiceMetricSnapshot> {
        let mut snaps: Vec<ServiceMetricSnapshot> =
            self.nodes.iter().map(|e| e.value().metric.snapshot()).collect();
        snaps.sort_by(|a, b| a.name.cmp(&b.name));
        snaps
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshots())
    }

    /// Render every metric in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let nodes: Vec<Arc<TreeNode>> = self
            .registered_names()
            .iter()
            .filter_map(|name| self.node(name))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "# TYPE {DURATION_FAMILY} histogram");
        for node in &nodes {
            node.metric.render_duration(DURATION_FAMILY, &mut out);
        }
        let _ = writeln!(out, "# TYPE {ERRORS_FAMILY} counter");
        for node in &nodes {
            node.metric.render_errors(ERRORS_FAMILY, &mut out);
        }
        out
    }
}

impl MetricRegistry for MetricTree {
    fn lookup(&self, name: &str) -> Option<Arc<dyn MetricNode>> {
        self.node(name).map(|n| n as Arc<dyn MetricNode>)
    }
}
