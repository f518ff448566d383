//! Node and path tracking for comparisons.
//!
//! ## Components
//!
//! - [`Segment`]: one step of a path (member, index, key)
//! - [`NodeEntry`]: an immutable node with a back-reference to its parent
//! - [`NodeArena`]: slab-backed storage for the nodes of one comparison
//! - [`PathPattern`]: patterns matched against node paths by option rules
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Enter child | O(1) |
//! | Release node | O(1) |
//! | Render path | O(depth) |

pub mod arena;
pub mod node;
pub mod pattern;

pub use arena::{NodeArena, NodeId};
pub use node::{NodeEntry, Segment};
pub use pattern::{PathPattern, PatternSegment};
