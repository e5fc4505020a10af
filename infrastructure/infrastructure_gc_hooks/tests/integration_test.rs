//! Integration tests for infrastructure_gc_hooks crate
//!
//! These tests drive a private runtime through the full life of a
//! finalizable object: barriered field stores, blocking calls inside
//! GC-free zones, mark/visit reporting and reclamation.

use entities_file_io::{ManagedString, ObjectId};
use infrastructure_gc_hooks::*;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Tracked {
    name: GcField,
}

impl Trace for Tracked {
    fn mark(&self, ctx: &mut MarkContext) {
        self.name.mark(ctx);
    }

    fn visit(&mut self, ctx: &mut VisitContext<'_>) {
        self.name.visit(ctx);
    }
}

#[test]
fn test_object_lifecycle_through_collection() {
    let runtime = Arc::new(GcRuntime::new());
    let owner = ObjectId::next();
    let object = Arc::new(Mutex::new(Tracked {
        name: GcField::new(owner, ManagedString::new("data.bin"), runtime.as_ref()),
    }));
    assert_eq!(runtime.barrier_count(), 1);

    let released = Arc::new(AtomicBool::new(false));
    let state = object.clone();
    let flag = released.clone();
    let collector = runtime.clone();
    let anchor: Arc<dyn Any + Send + Sync> = Arc::new(());
    runtime.register_finalizer(
        owner,
        Arc::downgrade(&anchor),
        Box::new(move || {
            blocking(collector.as_ref(), || flag.store(true, Ordering::SeqCst));
            state.lock().name.clear(collector.as_ref());
        }),
    );

    let length = blocking(runtime.as_ref(), || object.lock().name.get().len());
    assert_eq!(length, 8);
    assert_eq!(runtime.threads_in_zone(), 0);

    let mut marks = MarkContext::new();
    object.lock().mark(&mut marks);
    assert!(marks.is_marked(object.lock().name.get()));

    assert_eq!(runtime.collect(), 0);
    assert!(runtime.has_finalizer(owner));

    drop(anchor);
    assert_eq!(runtime.collect(), 1);
    assert!(released.load(Ordering::SeqCst));
    assert!(object.lock().name.get().is_empty());
    assert_eq!(runtime.barrier_count(), 2);
    assert_eq!(runtime.phase(), CollectionPhase::Idle);
    assert_eq!(runtime.collections(), 2);
}

#[test]
fn test_visit_replaces_field_value() {
    let runtime = GcRuntime::new();
    let mut object = Tracked {
        name: GcField::new(ObjectId::next(), ManagedString::new("a"), &runtime),
    };
    let mut relocate = |value: &mut ManagedString| *value = ManagedString::new(value.as_str());
    let before = object.name.get().identity();
    let mut ctx = VisitContext::new(&mut relocate);
    object.visit(&mut ctx);

    assert_eq!(ctx.visited(), 1);
    assert_eq!(object.name.get().as_str(), "a");
    assert_ne!(object.name.get().identity(), before);
}

#[test]
fn test_shutdown_finalizes_reachable_objects() {
    let runtime = GcRuntime::with_config(GcRuntimeConfig {
        finalize_on_shutdown: true,
    });
    let anchor: Arc<dyn Any + Send + Sync> = Arc::new(());
    runtime.register_finalizer(ObjectId::next(), Arc::downgrade(&anchor), Box::new(|| {}));

    assert_eq!(runtime.collect(), 0);
    assert_eq!(runtime.shutdown(), 1);
    assert_eq!(runtime.pending_finalizers(), 0);
}
