//! Registry and handle test doubles shared by the interceptor tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use svcmetric_core::{Arg, MethodIdentity, MethodMeta, MetricHandle, MetricNode, MetricRegistry};

/// One `trace` call as seen by [`RecordingHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub duration_nanos: u64,
    pub error_occurred: bool,
    pub arg_count: usize,
    pub first_arg: Option<u32>,
}

pub struct RecordingHandle {
    pub name: String,
    traces: Mutex<Vec<Recorded>>,
}

impl RecordingHandle {
    pub fn traces(&self) -> Vec<Recorded> {
        self.traces.lock().unwrap().clone()
    }
}

impl MetricHandle for RecordingHandle {
    fn trace(&self, duration_nanos: u64, error_occurred: bool, args: &[Arg<'_>]) {
        self.traces.lock().unwrap().push(Recorded {
            duration_nanos,
            error_occurred,
            arg_count: args.len(),
            first_arg: args.first().and_then(|a| a.downcast_ref::<u32>()).copied(),
        });
    }
}

/// Handle whose `trace` always panics.
pub struct PanickingHandle;

impl MetricHandle for PanickingHandle {
    fn trace(&self, _duration_nanos: u64, _error_occurred: bool, _args: &[Arg<'_>]) {
        panic!("trace exploded");
    }
}

struct RecordingNode {
    handle: Arc<dyn MetricHandle>,
    materialized: Arc<AtomicUsize>,
}

impl MetricNode for RecordingNode {
    fn metric(&self, _method: &MethodMeta, _args: &[Arg<'_>]) -> Arc<dyn MetricHandle> {
        self.materialized.fetch_add(1, Ordering::SeqCst);
        Arc::clone(&self.handle)
    }
}

/// Registry counting lookups; one shared handle per name.
#[derive(Default)]
pub struct RecordingRegistry {
    handles: Mutex<HashMap<String, Arc<RecordingHandle>>>,
    panicking: Mutex<HashSet<String>>,
    lookups: AtomicUsize,
    materialized: Arc<AtomicUsize>,
    lookup_delay: Option<Duration>,
}

impl RecordingRegistry {
    pub fn with_metrics(names: &[&str]) -> Arc<Self> {
        let reg = Self::default();
        for name in names {
            reg.register(name);
        }
        Arc::new(reg)
    }

    /// Registry whose lookups sleep, widening the first-use race window.
    pub fn slow(names: &[&str], delay: Duration) -> Arc<Self> {
        let reg = Self {
            lookup_delay: Some(delay),
            ..Self::default()
        };
        for name in names {
            reg.register(name);
        }
        Arc::new(reg)
    }

    pub fn register(&self, name: &str) {
        self.handles.lock().unwrap().insert(
            name.to_string(),
            Arc::new(RecordingHandle {
                name: name.to_string(),
                traces: Mutex::new(Vec::new()),
            }),
        );
    }

    pub fn register_panicking(&self, name: &str) {
        self.panicking.lock().unwrap().insert(name.to_string());
    }

    pub fn handle(&self, name: &str) -> Arc<RecordingHandle> {
        self.handles.lock().unwrap().get(name).cloned().expect("metric registered")
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn materialized(&self) -> usize {
        self.materialized.load(Ordering::SeqCst)
    }
}

impl MetricRegistry for RecordingRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn MetricNode>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.lookup_delay {
            thread::sleep(delay);
        }
        let handle = if self.panicking.lock().unwrap().contains(name) {
            Arc::new(PanickingHandle) as Arc<dyn MetricHandle>
        } else {
            self.handles.lock().unwrap().get(name).cloned()? as Arc<dyn MetricHandle>
        };
        Some(Arc::new(RecordingNode {
            handle,
            materialized: Arc::clone(&self.materialized),
        }))
    }
}

/// Error type returned by delegates in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyError {
    pub code: u16,
    pub detail: String,
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body failed ({}): {}", self.code, self.detail)
    }
}

pub struct OrderService {
    pub shard: u32,
}

pub const FOO: MethodMeta = MethodMeta::with_metric(
    MethodIdentity::new("OrderService", "fn foo(&self, u32) -> u32"),
    "svc.foo",
);

pub const BAR: MethodMeta = MethodMeta::with_metric(
    MethodIdentity::new("OrderService", "fn bar(&self) -> ()"),
    "svc.bar",
);

pub const UNANNOTATED: MethodMeta =
    MethodMeta::new(MethodIdentity::new("OrderService", "fn plain(&self) -> ()"));

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
