//! Per-path change notification: a multicast subscription registry
//! keyed by exact canonical path.
//!
//! Dispatch is synchronous and in registration order. The registry lock
//! is never held across a callback, so callbacks may re-enter the
//! filesystem, subscribe, or unsubscribe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the mutated path.
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct Subscriber {
    id: String,
    callback: ChangeCallback,
}

/// Process-wide (per-`Vfs`) subscription registry with explicit
/// lifecycle: keys are created on first subscribe and pruned once their
/// last subscriber leaves.
#[derive(Default)]
pub struct ChangeBus {
    registry: Mutex<HashMap<String, Vec<Subscriber>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for the exact path key and returns its
    /// handle. The path must already be canonical.
    pub fn subscribe(self: Arc<Self>, path: &str, callback: ChangeCallback) -> Subscription {
        let id = uuid7::uuid7().to_string();
        {
            let mut registry = self.lock();
            registry.entry(path.to_string()).or_default().push(Subscriber {
                id: id.clone(),
                callback,
            });
        }
        Subscription {
            bus: Arc::downgrade(&self),
            path: path.to_string(),
            id,
        }
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Invokes every subscriber of `key`, in registration order, with
    /// the affected path. The callback list is cloned out first so the
    /// lock is released before any callback runs.
    pub(crate) fn dispatch(&self, key: &str, affected: &str) {
        let callbacks: Vec<ChangeCallback> = {
            let registry = self.lock();
            registry
                .get(key)
                .map(|subs| subs.iter().map(|s| s.callback.clone()).collect())
                .unwrap_or_default()
        };
        for callback in callbacks {
            callback(affected);
        }
    }

    fn remove(&self, path: &str, id: &str) {
        let mut registry = self.lock();
        if let Some(subs) = registry.get_mut(path) {
            subs.retain(|s| s.id != id);
            if subs.is_empty() {
                registry.remove(path);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Subscriber>>> {
        // Callbacks run outside the lock, so a poisoned registry still
        // holds consistent data.
        self.registry.lock().unwrap_or_else(|p| p.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn key_count(&self) -> usize {
        self.lock().len()
    }
}

/// Handle for one registration.
#[must_use = "dropping the handle leaves the callback registered; call unsubscribe to remove it"]
pub struct Subscription {
    bus: Weak<ChangeBus>,
    path: String,
    id: String,
}

impl Subscription {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Removes this registration; its path key is pruned once empty.
    pub fn unsubscribe(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(&self.path, &self.id);
        }
    }
}
