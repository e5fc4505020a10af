//! Safe-Zone Guard
//!
//! Brackets a potentially blocking platform call. The guard enters the GC-free
//! zone when created and exits it exactly once: either through [`SafeZone::exit`]
//! or, on early return and unwinding, when dropped.

use crate::collector::Collector;
use std::marker::PhantomData;

/// Scoped GC-free zone
///
/// Not `Send`: a zone belongs to the thread that entered it.
#[must_use = "dropping the guard immediately exits the zone"]
pub struct SafeZone<'a> {
    collector: &'a dyn Collector,
    active: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'a> SafeZone<'a> {
    /// Enter the zone
    pub fn enter(collector: &'a dyn Collector) -> Self {
        collector.enter_gc_free_zone();
        Self {
            collector,
            active: true,
            _not_send: PhantomData,
        }
    }

    /// Exit the zone and resynchronize with the collector
    pub fn exit(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            self.collector.exit_gc_free_zone();
        }
    }
}

impl Drop for SafeZone<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Run `call` inside a GC-free zone
///
/// The zone is exited before the result is handed back, so the caller may
/// build managed values (including errors) from it.
pub fn blocking<T>(collector: &dyn Collector, call: impl FnOnce() -> T) -> T {
    let zone = SafeZone::enter(collector);
    let result = call();
    zone.exit();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::GcRuntime;

    #[test]
    fn test_zone_exit_on_drop() {
        let runtime = GcRuntime::new();
        {
            let _zone = SafeZone::enter(&runtime);
            assert!(runtime.in_gc_free_zone());
        }
        assert!(!runtime.in_gc_free_zone());
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_explicit_exit_is_not_repeated_by_drop() {
        let runtime = GcRuntime::new();
        let zone = SafeZone::enter(&runtime);
        zone.exit();
        assert!(!runtime.in_gc_free_zone());
        assert_eq!(runtime.threads_in_zone(), 0);
    }

    #[test]
    fn test_blocking_returns_outside_zone() {
        let runtime = GcRuntime::new();
        let inside = blocking(&runtime, || runtime.in_gc_free_zone());
        assert!(inside);
        assert!(!runtime.in_gc_free_zone());
    }

    #[test]
    fn test_zone_exits_on_early_return() {
        fn failing(runtime: &GcRuntime) -> Result<(), ()> {
            let _zone = SafeZone::enter(runtime);
            Err::<(), ()>(())?;
            Ok(())
        }

        let runtime = GcRuntime::new();
        assert!(failing(&runtime).is_err());
        assert!(!runtime.in_gc_free_zone());
    }
}
