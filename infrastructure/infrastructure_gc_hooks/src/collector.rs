//! Collector Interface
//!
//! The documented hooks the file I/O core may call. Any collector the runtime
//! embeds implements this trait; [`GcRuntime`](crate::GcRuntime) is the
//! in-process implementation.

use entities_file_io::{ManagedString, ObjectId};
use std::any::Any;
use std::sync::Weak;

/// Cleanup callback run by the reclamation pass
pub type Finalizer = Box<dyn FnOnce() + Send + 'static>;

/// Reachability probe for a finalizable object
///
/// The object is considered unreachable once the probe can no longer be
/// upgraded.
pub type Reachability = Weak<dyn Any + Send + Sync>;

/// Hooks into the runtime's garbage collector
pub trait Collector: Send + Sync {
    /// Announce that the calling thread holds no managed references on its
    /// native stack and will not touch managed memory until it exits the zone
    ///
    /// Calls nest; only the outermost enter/exit pair is visible to the
    /// collector.
    fn enter_gc_free_zone(&self);

    /// Resynchronize with the collector
    ///
    /// Blocks while a collection pass is finalizing.
    fn exit_gc_free_zone(&self);

    /// Whether the calling thread is currently inside a GC-free zone
    fn in_gc_free_zone(&self) -> bool;

    /// Store barrier for a managed reference field of `owner`
    ///
    /// Must be called for every store, including stores of the empty string.
    fn write_barrier(&self, owner: ObjectId, stored: &ManagedString);

    /// Register a finalizer to run once `probe` expires
    ///
    /// The finalizer runs at most once, on whichever thread performs the
    /// reclamation pass. Registration cannot fail.
    fn register_finalizer(&self, owner: ObjectId, probe: Reachability, finalizer: Finalizer);
}
