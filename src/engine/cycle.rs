//! Path-scoped cycle detection.
//!
//! ## Design
//!
//! The guard holds the identities of the subject objects on the active path,
//! from the root down to the node being compared. Identities are pushed when
//! a recursive step enters an object and popped when it leaves, so the guard
//! is a stack rather than a memo: an object reached again from a sibling
//! branch is compared normally, only an object reached again from its own
//! descendants is a cycle.
//!
//! ```text
//! root ─┬─ .left  ─ shared        shared seen twice, never on one path: fine
//!       └─ .right ─ shared
//!
//! node ─── .next ─ node            node is still active: cycle
//! ```

use std::collections::HashSet;

/// Stack of subject identities on the active path.
#[derive(Debug, Default)]
pub struct CycleGuard {
    stack: Vec<usize>,
    active: HashSet<usize>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an identity.
    ///
    /// Returns `false`, leaving the guard unchanged, when the identity is
    /// already on the active path.
    pub fn enter(&mut self, identity: usize) -> bool {
        if !self.active.insert(identity) {
            return false;
        }
        self.stack.push(identity);
        true
    }

    /// Pop the identity pushed by the matching [`enter`](Self::enter).
    pub fn exit(&mut self, identity: usize) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(identity), "cycle guard exited out of order");
        self.active.remove(&identity);
    }

    #[inline]
    pub fn is_active(&self, identity: usize) -> bool {
        self.active.contains(&identity)
    }

    /// Number of objects on the active path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
