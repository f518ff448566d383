//! Slab-backed arena of comparison nodes.
//!
//! ## Memory Model
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - Keys are reused after removal
//! - O(1) insert, remove, and lookup
//!
//! The engine inserts a node when it enters a member, element or key and
//! releases it when that branch completes, so the arena only ever holds the
//! active path plus the node being worked on. Failures render their path as
//! a string before the node is released.
//!
//! ## Example
//!
//! ```
//! use deep_equivalency::path::{NodeArena, Segment};
//!
//! let mut arena = NodeArena::new();
//! let root = arena.root();
//! let orders = arena.child(root, Segment::Member("orders".into()));
//! let third = arena.child(orders, Segment::Index(2));
//!
//! assert_eq!(arena.path(third), ".orders[2]");
//! assert_eq!(arena.description(third), "root.orders[2]");
//! assert_eq!(arena.depth(third), 2);
//!
//! arena.release(third);
//! assert_eq!(arena.len(), 2);
//! ```

use slab::Slab;

use crate::path::{NodeEntry, Segment};

/// Arena key of a comparison node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Arena of comparison nodes, owned by a single top-level comparison.
#[derive(Debug, Default)]
pub struct NodeArena {
    /// Key: slab index, Value: NodeEntry
    nodes: Slab<NodeEntry>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self { nodes: Slab::new() }
    }

    /// Create an arena with room for `capacity` live nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
        }
    }

    /// Insert a root node.
    pub fn root(&mut self) -> NodeId {
        NodeId(self.nodes.insert(NodeEntry::root()))
    }

    /// Insert a node below `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has already been released.
    pub fn child(&mut self, parent: NodeId, segment: Segment) -> NodeId {
        let depth = self.nodes[parent.0].depth;
        NodeId(self.nodes.insert(NodeEntry::child(parent, depth, segment)))
    }

    /// Release a node whose branch has completed.
    ///
    /// Returns the entry if it was still live.
    pub fn release(&mut self, id: NodeId) -> Option<NodeEntry> {
        self.nodes.try_remove(id.0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(id.0)
    }

    /// Depth of a live node.
    ///
    /// # Panics
    ///
    /// Panics if `id` has been released.
    #[inline]
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Segments from the root (excluded) down to `id` (included).
    pub fn segments(&self, id: NodeId) -> Vec<&Segment> {
        let mut segments = Vec::with_capacity(self.depth(id));
        let mut current = Some(id);
        while let Some(key) = current {
            let entry = &self.nodes[key.0];
            if !entry.is_root() {
                segments.push(&entry.segment);
            }
            current = entry.parent;
        }
        segments.reverse();
        segments
    }

    /// Rendered path of a node, e.g. `.orders[2].total`. Empty for the root.
    pub fn path(&self, id: NodeId) -> String {
        self.segments(id).iter().map(|s| s.to_string()).collect()
    }

    /// Rendered path of a would-be child of `parent`, without inserting it.
    pub fn child_path(&self, parent: NodeId, segment: &Segment) -> String {
        format!("{}{}", self.path(parent), segment)
    }

    /// Path prefixed with `root`, for human-readable messages.
    pub fn description(&self, id: NodeId) -> String {
        format!("root{}", self.path(id))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
