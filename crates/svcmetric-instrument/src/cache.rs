use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use svcmetric_core::{MethodIdentity, MetricHandle, Result};

/// Resolved metric handles keyed by method.
///
/// - `handles`: `MethodIdentity -> handle`, written once per method
/// - `resolving`: per-method mutexes held only while a miss is being resolved
///
/// Entries are never evicted.
#[derive(Default)]
pub struct MethodMetricCache {
    handles: DashMap<MethodIdentity, Arc<dyn MetricHandle>>,
    resolving: DashMap<MethodIdentity, Arc<Mutex<()>>>,
}

impl MethodMetricCache {
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
            resolving: DashMap::new(),
        }
    }

    pub fn get(&self, id: &MethodIdentity) -> Option<Arc<dyn MetricHandle>> {
        self.handles.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Last writer wins.
    pub fn put(&self, id: MethodIdentity, handle: Arc<dyn MetricHandle>) {
        self.handles.insert(id, handle);
    }

    /// Return the cached handle, or run `resolve` under the method's own lock.
    ///
    /// Threads missing on the same method queue on one mutex and re-check
    /// after acquiring it, so `resolve` runs once per method unless it fails.
    /// Failures are not cached.
    pub fn get_or_resolve<F>(&self, id: MethodIdentity, resolve: F) -> Result<Arc<dyn MetricHandle>>
    where
        F: FnOnce() -> Result<Arc<dyn MetricHandle>>,
    {
        if let Some(handle) = self.get(&id) {
            return Ok(handle);
        }

        // Clone the Arc out so the shard lock is not held while we wait.
        let lock = Arc::clone(self.resolving.entry(id).or_default().value());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = self.get(&id) {
            return Ok(handle);
        }

        // Late arrivals re-check the map after locking, so dropping the
        // mutex entry cannot cause a second resolution of a cached method.
        // Declared after `_guard`, so it runs first, also when `resolve` panics.
        let _cleanup = ResolvingEntry {
            resolving: &self.resolving,
            id,
        };

        let resolved = resolve();
        if let Ok(handle) = &resolved {
            self.put(id, Arc::clone(handle));
        }
        resolved
    }

    /// Methods with a resolution in flight.
    pub fn pending_resolutions(&self) -> usize {
        self.resolving.len()
    }

    /// Number of warm methods.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Removes a method's resolution mutex on every exit path.
struct ResolvingEntry<'a> {
    resolving: &'a DashMap<MethodIdentity, Arc<Mutex<()>>>,
    id: MethodIdentity,
}

impl Drop for ResolvingEntry<'_> {
    fn drop(&mut self) {
        self.resolving.remove(&self.id);
    }
}
