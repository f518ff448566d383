//! Maximum matching of predicates against collection items.
//!
//! ## Components
//!
//! - [`Predicate`] / [`Element`]: inputs tagged with their original positions
//! - [`solve`] / [`solve_by`]: maximum-cardinality 1-to-1 matching
//! - [`satisfy`] / [`satisfy_any_order`]: assertions built on the solver
//!
//! The solver is independent of the equivalency engine. The engine reuses
//! [`solve_by`] to pair up items of unordered collections.

pub mod satisfy;
pub mod solver;

pub use satisfy::{satisfy, satisfy_any_order, SatisfyFailure};
pub use solver::{solve, solve_by, Element, MatchAssignment, Predicate, PredicateSet};
