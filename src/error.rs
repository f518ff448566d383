//! Configuration errors.
//!
//! Data mismatches are never errors: they are collected as
//! [`Failure`](crate::engine::Failure) values in a report. An
//! [`EquivalencyError`] means the caller asked for something the engine
//! cannot do, and it aborts the comparison immediately.

use thiserror::Error;

/// Errors raised while resolving options or walking a graph with them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquivalencyError {
    /// A member path pattern could not be parsed.
    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPathPattern { pattern: String, reason: String },

    /// `max_depth` was set to zero, which would forbid comparing the root.
    #[error("maximum recursion depth must be at least 1")]
    InvalidMaxDepth,

    /// The same path was both included and excluded.
    #[error("path `{pattern}` is both included and excluded")]
    ConflictingPathRules { pattern: String },

    /// The member selection policy left nothing to compare on a type that has members.
    #[error("no members were selected for comparison at {path} (type {type_name})")]
    NoMembersSelected { path: String, type_name: String },
}
