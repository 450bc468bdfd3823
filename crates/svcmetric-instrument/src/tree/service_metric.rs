//! Atomic per-metric aggregation.
//!
//! Histogram buckets are fixed in microseconds to avoid floating point math.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use svcmetric_core::{Arg, MetricHandle};

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
pub const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

/// Call statistics for one named metric.
pub struct ServiceMetric {
    name: String,
    calls: AtomicU64,
    errors: AtomicU64,
    sum_nanos: AtomicU64,
    buckets: [AtomicU64; 9],
}

/// Point-in-time copy of a [`ServiceMetric`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMetricSnapshot {
    pub name: String,
    pub calls: u64,
    pub errors: u64,
    pub sum_nanos: u64,
    /// `(le_micros, cumulative_count)`
    pub buckets: Vec<(u64, u64)>,
}

impl ServiceMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            buckets: Default::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> ServiceMetricSnapshot {
        ServiceMetricSnapshot {
            name: self.name.clone(),
            calls: self.calls.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            sum_nanos: self.sum_nanos.load(Ordering::Relaxed),
            buckets: BUCKETS_MICROS
                .iter()
                .zip(self.buckets.iter())
                .map(|(&le, b)| (le, b.load(Ordering::Relaxed)))
                .collect(),
        }
    }

    /// Histogram lines in Prometheus text exposition format (unit: microseconds).
    pub(crate) fn render_duration(&self, family: &str, out: &mut String) {
        let snap = self.snapshot();
        let label = format!("metric=\"{}\"", escape_label(&snap.name));

        for (le, count) in &snap.buckets {
            let _ = writeln!(out, "{family}_bucket{{{label},le=\"{le}\"}} {count}");
        }
        let _ = writeln!(out, "{family}_bucket{{{label},le=\"+Inf\"}} {}", snap.calls);
        let _ = writeln!(out, "{family}_sum{{{label}}} {}", snap.sum_nanos / 1_000);
        let _ = writeln!(out, "{family}_count{{{label}}} {}", snap.calls);
    }

    pub(crate) fn render_errors(&self, family: &str, out: &mut String) {
        let label = format!("metric=\"{}\"", escape_label(&self.name));
        let _ = writeln!(out, "{family}{{{label}}} {}", self.errors.load(Ordering::Relaxed));
    }
}

impl MetricHandle for ServiceMetric {
    fn trace(&self, duration_nanos: u64, error_occurred: bool, _args: &[Arg<'_>]) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if error_occurred {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.sum_nanos.fetch_add(duration_nanos, Ordering::Relaxed);

        // Cumulative: bump every bucket at or above the value.
        let micros = duration_nanos / 1_000;
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
