//! In-Process Collector Runtime
//!
//! [`GcRuntime`] implements the [`Collector`] hooks for the runtime embedding
//! this core. It tracks which threads are inside GC-free zones, owns the
//! finalizer registry, and runs reclamation passes.
//!
//! ## Collection Phases
//!
//! A pass moves through `Idle → Marking → Finalizing → Idle`. A thread leaving
//! a GC-free zone while another thread is finalizing blocks until the pass
//! returns to `Idle`. The finalizing thread itself is never blocked, so a
//! finalizer may perform zone-wrapped platform calls.

use crate::collector::{Collector, Finalizer, Reachability};
use crate::finalizer::FinalizerRegistry;
use entities_file_io::{ManagedString, ObjectId};
use lazy_static::lazy_static;
use parking_lot::{Condvar, Mutex};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace, warn};

thread_local! {
    static ZONE_DEPTH: Cell<u32> = Cell::new(0);
}

lazy_static! {
    static ref GLOBAL_RUNTIME: Arc<GcRuntime> = Arc::new(GcRuntime::new());
}

/// The process-wide collector runtime
pub fn gc_runtime() -> Arc<GcRuntime> {
    Arc::clone(&GLOBAL_RUNTIME)
}

/// Collection pass phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPhase {
    /// No pass in progress
    Idle,
    /// Tracing live objects
    Marking,
    /// Running finalizers of unreachable objects
    Finalizing,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct GcRuntimeConfig {
    /// Run every remaining finalizer on [`GcRuntime::shutdown`], reachable or not
    pub finalize_on_shutdown: bool,
}

impl Default for GcRuntimeConfig {
    fn default() -> Self {
        Self {
            finalize_on_shutdown: true,
        }
    }
}

struct CollectorState {
    phase: CollectionPhase,
    finalizing_thread: Option<ThreadId>,
    threads_in_zone: usize,
    collections: u64,
}

/// In-process collector
pub struct GcRuntime {
    config: GcRuntimeConfig,
    state: Mutex<CollectorState>,
    phase_changed: Condvar,
    finalizers: FinalizerRegistry,
    barrier_count: AtomicU64,
}

impl GcRuntime {
    /// Create a runtime with the default configuration
    pub fn new() -> Self {
        Self::with_config(GcRuntimeConfig::default())
    }

    /// Create a runtime with a custom configuration
    pub fn with_config(config: GcRuntimeConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CollectorState {
                phase: CollectionPhase::Idle,
                finalizing_thread: None,
                threads_in_zone: 0,
                collections: 0,
            }),
            phase_changed: Condvar::new(),
            finalizers: FinalizerRegistry::new(),
            barrier_count: AtomicU64::new(0),
        }
    }

    /// Run one reclamation pass
    ///
    /// Waits for any pass already in progress, then runs the finalizer of
    /// every registered object that has become unreachable. Returns the number
    /// of finalizers run.
    pub fn collect(&self) -> usize {
        self.begin_pass();
        let doomed = self.finalizers.take_unreachable();
        self.run_finalizers(doomed)
    }

    /// Run every remaining finalizer if configured to, regardless of reachability
    ///
    /// Used at process exit. Returns the number of finalizers run.
    pub fn shutdown(&self) -> usize {
        if !self.config.finalize_on_shutdown {
            debug!(pending = self.finalizers.pending(), "gc runtime shutdown without finalization");
            return 0;
        }
        self.begin_pass();
        let remaining = self.finalizers.take_all();
        self.run_finalizers(remaining)
    }

    fn begin_pass(&self) {
        let mut state = self.state.lock();
        while state.phase != CollectionPhase::Idle {
            self.phase_changed.wait(&mut state);
        }
        state.phase = CollectionPhase::Marking;
        trace!(threads_in_zone = state.threads_in_zone, "collection pass started");
    }

    fn run_finalizers(&self, doomed: Vec<(ObjectId, Finalizer)>) -> usize {
        {
            let mut state = self.state.lock();
            state.phase = CollectionPhase::Finalizing;
            state.finalizing_thread = Some(thread::current().id());
        }

        // Restores Idle even if a finalizer panics.
        let _reset = PassReset { runtime: self };

        let count = doomed.len();
        for (owner, finalizer) in doomed {
            debug!(%owner, "running finalizer");
            finalizer();
        }
        count
    }

    fn end_pass(&self) {
        let mut state = self.state.lock();
        state.phase = CollectionPhase::Idle;
        state.finalizing_thread = None;
        state.collections += 1;
        self.phase_changed.notify_all();
    }

    /// Current phase
    pub fn phase(&self) -> CollectionPhase {
        self.state.lock().phase
    }

    /// Number of completed passes
    pub fn collections(&self) -> u64 {
        self.state.lock().collections
    }

    /// Number of threads currently inside a GC-free zone
    pub fn threads_in_zone(&self) -> usize {
        self.state.lock().threads_in_zone
    }

    /// Number of finalizers not yet run
    pub fn pending_finalizers(&self) -> usize {
        self.finalizers.pending()
    }

    /// Whether a finalizer is pending for `owner`
    pub fn has_finalizer(&self, owner: ObjectId) -> bool {
        self.finalizers.is_registered(owner)
    }

    /// Number of write-barrier invocations so far
    pub fn barrier_count(&self) -> u64 {
        self.barrier_count.load(Ordering::Acquire)
    }
}

impl Default for GcRuntime {
    fn default() -> Self {
        Self::new()
    }
}

struct PassReset<'a> {
    runtime: &'a GcRuntime,
}

impl Drop for PassReset<'_> {
    fn drop(&mut self) {
        self.runtime.end_pass();
    }
}

impl Collector for GcRuntime {
    fn enter_gc_free_zone(&self) {
        let depth = ZONE_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            depth.set(next);
            next
        });
        if depth == 1 {
            self.state.lock().threads_in_zone += 1;
        }
    }

    fn exit_gc_free_zone(&self) {
        let depth = ZONE_DEPTH.with(|depth| depth.get());
        if depth == 0 {
            warn!("exit_gc_free_zone called outside a GC-free zone");
            return;
        }
        if depth == 1 {
            let me = thread::current().id();
            let mut state = self.state.lock();
            while state.phase == CollectionPhase::Finalizing && state.finalizing_thread != Some(me) {
                self.phase_changed.wait(&mut state);
            }
            state.threads_in_zone -= 1;
        }
        ZONE_DEPTH.with(|cell| cell.set(depth - 1));
    }

    fn in_gc_free_zone(&self) -> bool {
        ZONE_DEPTH.with(|depth| depth.get() > 0)
    }

    fn write_barrier(&self, owner: ObjectId, stored: &ManagedString) {
        self.barrier_count.fetch_add(1, Ordering::AcqRel);
        trace!(%owner, len = stored.len(), "write barrier");
    }

    fn register_finalizer(&self, owner: ObjectId, probe: Reachability, finalizer: Finalizer) {
        self.finalizers.register(owner, probe, finalizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::sync::mpsc;
    use std::time::Duration;

    fn object() -> Arc<dyn Any + Send + Sync> {
        Arc::new(())
    }

    #[test]
    fn test_nested_zones_count_once() {
        let runtime = GcRuntime::new();
        runtime.enter_gc_free_zone();
        runtime.enter_gc_free_zone();
        assert_eq!(runtime.threads_in_zone(), 1);
        runtime.exit_gc_free_zone();
        assert!(runtime.in_gc_free_zone());
        runtime.exit_gc_free_zone();
        assert!(!runtime.in_gc_free_zone());
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_unbalanced_exit_is_ignored() {
        let runtime = GcRuntime::new();
        runtime.exit_gc_free_zone();
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_collect_runs_unreachable_finalizers_once() {
        let runtime = GcRuntime::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let kept = object();
        let dropped = object();
        for target in [&kept, &dropped] {
            let counter = runs.clone();
            runtime.register_finalizer(
                ObjectId::next(),
                Arc::downgrade(target),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        drop(dropped);

        assert_eq!(runtime.collect(), 1);
        assert_eq!(runtime.collect(), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.pending_finalizers(), 1);
        assert_eq!(runtime.collections(), 2);
        assert_eq!(runtime.phase(), CollectionPhase::Idle);
    }

    #[test]
    fn test_shutdown_runs_remaining_finalizers() {
        let runtime = GcRuntime::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let live = object();
        runtime.register_finalizer(
            ObjectId::next(),
            Arc::downgrade(&live),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert_eq!(runtime.shutdown(), 1);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_shutdown_without_finalization() {
        let runtime = GcRuntime::with_config(GcRuntimeConfig {
            finalize_on_shutdown: false,
        });
        let live = object();
        runtime.register_finalizer(ObjectId::next(), Arc::downgrade(&live), Box::new(|| {}));
        assert_eq!(runtime.shutdown(), 0);
        assert_eq!(runtime.pending_finalizers(), 1);
    }

    #[test]
    fn test_finalizer_may_use_zones() {
        let runtime = Arc::new(GcRuntime::new());
        let inner = runtime.clone();
        let target = object();
        runtime.register_finalizer(
            ObjectId::next(),
            Arc::downgrade(&target),
            Box::new(move || {
                inner.enter_gc_free_zone();
                inner.exit_gc_free_zone();
            }),
        );
        drop(target);
        assert_eq!(runtime.collect(), 1);
    }

    #[test]
    fn test_zone_exit_waits_for_finalizing_pass() {
        let runtime = Arc::new(GcRuntime::new());
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));

        let target = object();
        let done = finished.clone();
        runtime.register_finalizer(
            ObjectId::next(),
            Arc::downgrade(&target),
            Box::new(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                done.store(true, Ordering::SeqCst);
            }),
        );
        drop(target);

        // A mutator enters its zone before the pass starts
        let mutator_runtime = runtime.clone();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (exit_tx, exit_rx) = mpsc::channel::<()>();
        let mutator = thread::spawn(move || {
            mutator_runtime.enter_gc_free_zone();
            entered_tx.send(()).unwrap();
            exit_rx.recv().unwrap();
            mutator_runtime.exit_gc_free_zone();
        });
        entered_rx.recv().unwrap();

        let collector_runtime = runtime.clone();
        let collector = thread::spawn(move || collector_runtime.collect());
        started_rx.recv().unwrap();

        // The mutator tries to leave while the finalizer is still running
        exit_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(runtime.threads_in_zone(), 1);

        release_tx.send(()).unwrap();
        assert_eq!(collector.join().unwrap(), 1);
        mutator.join().unwrap();

        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_global_runtime_is_shared() {
        let a = gc_runtime();
        let b = gc_runtime();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
