//! Write-Barriered Fields
//!
//! A managed reference field embedded in a collector-visible object. The
//! field has no public setter that bypasses the barrier.

use crate::collector::Collector;
use crate::trace::{MarkContext, VisitContext};
use entities_file_io::{ManagedString, ObjectId};

/// Managed string field owned by `owner`
#[derive(Debug)]
pub struct GcField {
    owner: ObjectId,
    value: ManagedString,
}

impl GcField {
    /// Initialize the field; the initial store goes through the barrier too
    pub fn new(owner: ObjectId, value: ManagedString, collector: &dyn Collector) -> Self {
        collector.write_barrier(owner, &value);
        Self { owner, value }
    }

    /// Current value
    pub fn get(&self) -> &ManagedString {
        &self.value
    }

    /// Store a new value through the barrier
    pub fn set(&mut self, value: ManagedString, collector: &dyn Collector) {
        collector.write_barrier(self.owner, &value);
        self.value = value;
    }

    /// Store the empty string through the barrier
    pub fn clear(&mut self, collector: &dyn Collector) {
        self.set(ManagedString::empty(), collector);
    }

    /// Object that owns the field
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Report the field to a mark pass
    pub fn mark(&self, ctx: &mut MarkContext) {
        ctx.mark_member(&self.value);
    }

    /// Report the field to an allocation visitor, which may replace it
    pub fn visit(&mut self, ctx: &mut VisitContext<'_>) {
        ctx.visit_member(&mut self.value);
    }
}
