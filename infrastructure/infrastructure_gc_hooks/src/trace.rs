//! Mark and Visit Contexts
//!
//! Objects that hold managed references report them through [`Trace`]. The
//! mark pass only records identities; the visit pass hands out mutable access
//! so a moving collector can rewrite the reference.

use entities_file_io::ManagedString;
use std::collections::HashSet;

/// Objects with managed reference fields
pub trait Trace {
    /// Report every managed reference to the mark pass
    fn mark(&self, ctx: &mut MarkContext);

    /// Report every managed reference to the allocation visitor
    fn visit(&mut self, ctx: &mut VisitContext<'_>);
}

/// Mark pass state
#[derive(Debug, Default)]
pub struct MarkContext {
    marked: HashSet<usize>,
}

impl MarkContext {
    /// Create an empty mark set
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a member reference as live
    pub fn mark_member(&mut self, value: &ManagedString) {
        self.marked.insert(value.identity());
    }

    /// Whether `value` has been marked
    pub fn is_marked(&self, value: &ManagedString) -> bool {
        self.marked.contains(&value.identity())
    }

    /// Number of distinct objects marked
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    /// Whether nothing has been marked
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

/// Allocation visitor
pub struct VisitContext<'a> {
    visitor: &'a mut dyn FnMut(&mut ManagedString),
    visited: usize,
}

impl<'a> VisitContext<'a> {
    /// Wrap a visitor callback
    pub fn new(visitor: &'a mut dyn FnMut(&mut ManagedString)) -> Self {
        Self { visitor, visited: 0 }
    }

    /// Hand a member reference to the visitor
    pub fn visit_member(&mut self, value: &mut ManagedString) {
        self.visited += 1;
        (self.visitor)(value);
    }

    /// Number of references visited
    pub fn visited(&self) -> usize {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_deduplicates_shared_strings() {
        let name = ManagedString::new("x");
        let mut ctx = MarkContext::new();
        ctx.mark_member(&name);
        ctx.mark_member(&name.clone());
        assert_eq!(ctx.len(), 1);
        assert!(!ctx.is_marked(&ManagedString::new("x")));
    }

    #[test]
    fn test_visitor_can_replace_reference() {
        let mut value = ManagedString::new("old");
        let mut rewrite = |s: &mut ManagedString| *s = ManagedString::new("moved");
        let mut ctx = VisitContext::new(&mut rewrite);
        ctx.visit_member(&mut value);

        assert_eq!(ctx.visited(), 1);
        assert_eq!(value.as_str(), "moved");
    }
}
