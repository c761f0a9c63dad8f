use dashmap::DashMap;
use std::sync::Arc;

/// Per-cache handle that can push cache state to a remote site on demand.
pub trait StateTransferHandle: Send + Sync {
    fn is_running(&self) -> bool;

    /// Best-effort: requesting the same transfer twice is safe.
    fn start_automatic_state_transfer_to(&self, site_name: &str, is_initial: bool);
}

/// Resolves a local cache name to its state-transfer handle, if the cache exists.
pub trait StateTransferRegistry: Send + Sync {
    fn state_transfer(&self, cache_name: &str) -> Option<Arc<dyn StateTransferHandle>>;
}

/// DashMap-backed registry for embedders that register caches as they start
/// and deregister them as they stop.
#[derive(Default)]
pub struct InProcessRegistry {
    handles: DashMap<String, Arc<dyn StateTransferHandle>>,
}

impl InProcessRegistry {
    pub fn new() -> Self {
        InProcessRegistry {
            handles: DashMap::new(),
        }
    }

    pub fn register(&self, cache_name: impl Into<String>, handle: Arc<dyn StateTransferHandle>) {
        self.handles.insert(cache_name.into(), handle);
    }

    pub fn deregister(&self, cache_name: &str) {
        self.handles.remove(cache_name);
    }
}

impl StateTransferRegistry for InProcessRegistry {
    fn state_transfer(&self, cache_name: &str) -> Option<Arc<dyn StateTransferHandle>> {
        self.handles.get(cache_name).map(|entry| Arc::clone(entry.value()))
    }
}
