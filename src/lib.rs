//! # Deep Equivalency
//!
//! Structural equivalency of object graphs, plus maximum matching of
//! predicates against collection items.
//!
//! ## Architecture
//!
//! The crate consists of:
//! - **Types**: the dynamic [`Value`] graph and the [`Comparable`] projection
//! - **Path**: slab-backed node arena and member path patterns
//! - **Engine**: the ordered step pipeline, options, cycle guard and reports
//! - **Matching**: the augmenting-path solver and `satisfy` assertions
//!
//! ## Design Principles
//!
//! 1. **Data mismatches are data**: failures are structured values in a
//!    report, configuration mistakes are [`EquivalencyError`]s
//! 2. **Fresh state per call**: options are immutable, every comparison
//!    builds its own arena and cycle guard
//! 3. **Always terminates**: path-scoped cycle detection and a depth limit
//!    bound every walk
//!
//! ## Example
//!
//! ```
//! use deep_equivalency::{equivalent, EquivalencyOptions, Object};
//!
//! let subject = Object::new("Order")
//!     .with("id", 7)
//!     .with("lines", vec![3, 1, 2])
//!     .into_value();
//! let expectation = Object::new("Order")
//!     .with("id", 7)
//!     .with("lines", vec![1, 2, 3])
//!     .into_value();
//!
//! let result = equivalent(&subject, &expectation, &EquivalencyOptions::default()).unwrap();
//! assert!(result.is_proven());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Value graph: Value, Object, Comparable
pub mod types;

/// Node arena and path patterns
pub mod path;

/// Equivalency engine: step pipeline, options, reports
pub mod engine;

/// Maximum matching solver
pub mod matching;

mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{
    equivalent, EquivalencyEngine, EquivalencyOptions, EquivalencyResult, EquivalencySettings,
    Failure, FailureKind, Report,
};
pub use error::EquivalencyError;
pub use matching::{satisfy, satisfy_any_order, solve, MatchAssignment, Predicate, SatisfyFailure};
pub use types::{Comparable, Object, Value};
