//! Path segments and arena entries.
//!
//! ## Design
//!
//! A comparison node is one position in the comparison tree. It stores the
//! segment that leads to it from its parent and the parent's arena key, never
//! the parent itself. Paths are rebuilt on demand by walking parent keys up
//! to the root.
//!
//! ```text
//! root ─ .orders ─ [2] ─ .total      renders as  .orders[2].total
//! ```

use std::fmt;

use crate::path::NodeId;

/// One step from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The top of a comparison; renders as nothing.
    Root,
    /// A member of a complex object (`.name`)
    Member(String),
    /// A position in a collection (`[3]`)
    Index(usize),
    /// A key in a dictionary (`[key]`)
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Root => Ok(()),
            Segment::Member(name) => write!(f, ".{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Key(key) => write!(f, "[{key}]"),
        }
    }
}

/// Node stored in the arena.
///
/// Immutable once inserted: the segment and parent never change.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    /// Segment leading here from the parent
    pub segment: Segment,

    /// Parent node (arena key), `None` for a root
    pub parent: Option<NodeId>,

    /// Distance from the root (root = 0)
    pub depth: usize,
}

impl NodeEntry {
    /// Create a root entry.
    #[inline]
    pub fn root() -> Self {
        Self {
            segment: Segment::Root,
            parent: None,
            depth: 0,
        }
    }

    /// Create an entry below `parent`, which sits at `parent_depth`.
    #[inline]
    pub fn child(parent: NodeId, parent_depth: usize, segment: Segment) -> Self {
        Self {
            segment,
            parent: Some(parent),
            depth: parent_depth + 1,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
