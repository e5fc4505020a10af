//! Finalizer Registry
//!
//! Holds one cleanup callback per finalizable object together with a probe
//! telling whether the object is still reachable. Entries leave the registry
//! when they are taken for running, so a finalizer can never run twice.

use crate::collector::{Finalizer, Reachability};
use entities_file_io::ObjectId;
use parking_lot::Mutex;

struct Entry {
    owner: ObjectId,
    probe: Reachability,
    finalizer: Finalizer,
}

/// Registered finalizers
#[derive(Default)]
pub struct FinalizerRegistry {
    entries: Mutex<Vec<Entry>>,
}

impl FinalizerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `finalizer` for `owner`
    pub fn register(&self, owner: ObjectId, probe: Reachability, finalizer: Finalizer) {
        self.entries.lock().push(Entry {
            owner,
            probe,
            finalizer,
        });
    }

    /// Number of finalizers not yet run
    pub fn pending(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether a finalizer is pending for `owner`
    pub fn is_registered(&self, owner: ObjectId) -> bool {
        self.entries.lock().iter().any(|entry| entry.owner == owner)
    }

    /// Remove and return the finalizers of every unreachable object
    pub fn take_unreachable(&self) -> Vec<(ObjectId, Finalizer)> {
        let mut entries = self.entries.lock();
        let mut doomed = Vec::new();
        let mut index = 0;
        while index < entries.len() {
            if entries[index].probe.strong_count() == 0 {
                let entry = entries.swap_remove(index);
                doomed.push((entry.owner, entry.finalizer));
            } else {
                index += 1;
            }
        }
        doomed
    }

    /// Remove and return every finalizer, reachable or not
    pub fn take_all(&self) -> Vec<(ObjectId, Finalizer)> {
        self.entries
            .lock()
            .drain(..)
            .map(|entry| (entry.owner, entry.finalizer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn probe_for(object: &Arc<dyn Any + Send + Sync>) -> Reachability {
        Arc::downgrade(object)
    }

    #[test]
    fn test_only_unreachable_entries_are_taken() {
        let registry = FinalizerRegistry::new();
        let live: Arc<dyn Any + Send + Sync> = Arc::new(1u8);
        let dead: Arc<dyn Any + Send + Sync> = Arc::new(2u8);
        let live_id = ObjectId::next();
        let dead_id = ObjectId::next();

        registry.register(live_id, probe_for(&live), Box::new(|| {}));
        registry.register(dead_id, probe_for(&dead), Box::new(|| {}));
        drop(dead);

        let taken = registry.take_unreachable();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].0, dead_id);
        assert!(registry.is_registered(live_id));
        assert!(!registry.is_registered(dead_id));
    }

    #[test]
    fn test_taken_finalizer_runs_once() {
        let registry = FinalizerRegistry::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let object: Arc<dyn Any + Send + Sync> = Arc::new(());
        let counter = runs.clone();
        registry.register(
            ObjectId::next(),
            probe_for(&object),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        drop(object);

        for (_, finalizer) in registry.take_unreachable() {
            finalizer();
        }
        assert!(registry.take_unreachable().is_empty());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_take_all() {
        let registry = FinalizerRegistry::new();
        let object: Arc<dyn Any + Send + Sync> = Arc::new(());
        registry.register(ObjectId::next(), probe_for(&object), Box::new(|| {}));
        assert_eq!(registry.take_all().len(), 1);
        assert_eq!(registry.pending(), 0);
    }
}
