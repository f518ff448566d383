//! Equivalency engine.
//!
//! ## Design Principles
//!
//! 1. **Fixed pipeline**: every node runs through the same ordered steps
//!    (see [`PIPELINE`]); the order is part of the contract
//! 2. **Expectation-driven**: the expectation decides which members are
//!    compared; extra subject members are ignored unless configured
//! 3. **Path-scoped cycle detection**: an object is a cycle only when it
//!    reappears on its own active path, never when shared by siblings
//! 4. **Explicit reporting context**: failures flow into a [`Report`] passed
//!    down the walk, never into hidden global state
//!
//! ## Failure Semantics
//!
//! - [`EquivalencyEngine::compare`] stops at the first disproof
//! - [`EquivalencyEngine::compare_all`] walks every branch and returns all
//!   failures together
//! - Configuration mistakes abort the call with an [`EquivalencyError`]
//!
//! ## Example
//!
//! ```
//! use deep_equivalency::engine::EquivalencyEngine;
//! use deep_equivalency::types::Object;
//!
//! let engine = EquivalencyEngine::default();
//!
//! let subject = Object::new("Point").with("a", 1).with("b", 3).into_value();
//! let expectation = Object::new("Point").with("a", 1).with("b", 2).into_value();
//!
//! let result = engine.compare(&subject, &expectation).unwrap();
//! let failure = result.first_failure().unwrap();
//! assert_eq!(failure.path, ".b");
//! assert_eq!(failure.to_string(), "Expected root.b to be 2, but found 3.");
//! ```

pub mod comparands;
pub mod cycle;
pub mod members;
pub mod options;
pub mod report;
pub mod steps;
mod walker;

use std::time::Instant;

use tracing::{debug, debug_span};

pub use comparands::Comparands;
pub use cycle::CycleGuard;
pub use members::{MemberContext, MemberInfo, MemberSelectionRule};
pub use options::{
    AutoConversion, CollectionOrdering, CustomComparer, CyclicReferenceHandling, EnumHandling,
    EquivalencyOptions, EquivalencyOptionsBuilder, EquivalencySettings, MemberMatching,
    StringOptions, TypeMatcher, DEFAULT_MAX_DEPTH,
};
pub use report::{EquivalencyResult, Failure, FailureKind, FailureMode, Report};
pub use steps::{Step, StepResult, PIPELINE};

use crate::error::EquivalencyError;
use crate::types::{Comparable, Value};
use walker::Walker;

/// Compares object graphs under one set of options.
///
/// The engine itself is immutable; every call builds its own walk state, so
/// one engine can serve any number of comparisons.
#[derive(Debug, Clone, Default)]
pub struct EquivalencyEngine {
    options: EquivalencyOptions,
}

impl EquivalencyEngine {
    pub fn new(options: EquivalencyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EquivalencyOptions {
        &self.options
    }

    /// Compare and stop at the first failure.
    pub fn compare<S, E>(&self, subject: &S, expectation: &E) -> Result<EquivalencyResult, EquivalencyError>
    where
        S: Comparable + ?Sized,
        E: Comparable + ?Sized,
    {
        let mut report = Report::first_failure();
        self.compare_in(subject, expectation, &mut report)?;
        Ok(EquivalencyResult::new(report.into_failures()))
    }

    /// Compare every branch and collect all failures.
    pub fn compare_all<S, E>(&self, subject: &S, expectation: &E) -> Result<EquivalencyResult, EquivalencyError>
    where
        S: Comparable + ?Sized,
        E: Comparable + ?Sized,
    {
        let mut report = Report::all_failures();
        self.compare_in(subject, expectation, &mut report)?;
        Ok(EquivalencyResult::new(report.into_failures()))
    }

    /// Compare into a caller-supplied report.
    ///
    /// Returns whether this comparison added no failures. Several calls can
    /// share one report to aggregate failures across comparisons; the
    /// failure mode applies to each call on its own.
    pub fn compare_in<S, E>(
        &self,
        subject: &S,
        expectation: &E,
        report: &mut Report,
    ) -> Result<bool, EquivalencyError>
    where
        S: Comparable + ?Sized,
        E: Comparable + ?Sized,
    {
        self.compare_values(&subject.to_value(), &expectation.to_value(), report)
    }

    /// Compare two already-projected values.
    pub fn compare_values(
        &self,
        subject: &Value,
        expectation: &Value,
        report: &mut Report,
    ) -> Result<bool, EquivalencyError> {
        let span = debug_span!("equivalency.compare", mode = ?report.mode());
        let _enter = span.enter();
        let start = Instant::now();
        let mut scoped = report.scoped();

        let mut walker = Walker::new(&self.options);
        let root = walker.root();
        let result = walker.compare(subject, expectation, root, &mut scoped);
        walker.release(root);
        let proven = result?;

        let failures = scoped.len();
        report.append(scoped);
        let elapsed_micros = start.elapsed().as_micros() as u64;
        if proven {
            debug!(elapsed_micros, "equivalency_proven");
        } else {
            debug!(failures, elapsed_micros, "equivalency_disproven");
        }
        Ok(proven)
    }
}

/// Compare `subject` against `expectation` with `options`, stopping at the
/// first failure.
pub fn equivalent<S, E>(
    subject: &S,
    expectation: &E,
    options: &EquivalencyOptions,
) -> Result<EquivalencyResult, EquivalencyError>
where
    S: Comparable + ?Sized,
    E: Comparable + ?Sized,
{
    let mut report = Report::first_failure();
    let engine = EquivalencyEngine::new(options.clone());
    engine.compare_in(subject, expectation, &mut report)?;
    Ok(EquivalencyResult::new(report.into_failures()))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Object;

    fn pair(a: i64, b: i64) -> Value {
        Object::new("Pair").with("a", a).with("b", b).into_value()
    }

    #[test]
    fn test_first_failure_vs_all_failures() {
        let engine = EquivalencyEngine::default();
        let subject = pair(5, 6);
        let expectation = pair(1, 2);

        let first = engine.compare(&subject, &expectation).unwrap();
        assert_eq!(first.failures().len(), 1);
        assert_eq!(first.failures()[0].path, ".a");

        let all = engine.compare_all(&subject, &expectation).unwrap();
        let paths: Vec<&str> = all.failures().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".a", ".b"]);
    }

    #[test]
    fn test_shared_report_aggregates_with_reason() {
        let engine = EquivalencyEngine::default();
        let mut report = Report::all_failures().because("pairs are immutable");

        assert!(engine.compare_in(&pair(1, 2), &pair(1, 2), &mut report).unwrap());
        assert!(!engine.compare_in(&pair(1, 3), &pair(1, 2), &mut report).unwrap());
        assert!(!engine.compare_in(&pair(0, 2), &pair(1, 2), &mut report).unwrap());

        assert_eq!(report.len(), 2);
        assert!(report
            .failures()
            .iter()
            .all(|f| f.reason.as_deref() == Some("pairs are immutable")));
    }

    #[test]
    fn test_shared_first_failure_report_keeps_later_verdicts() {
        let engine = EquivalencyEngine::default();
        let mut report = Report::first_failure();

        assert!(!engine.compare_in(&pair(1, 3), &pair(1, 2), &mut report).unwrap());
        assert!(!engine.compare_in(&pair(9, 9), &pair(1, 2), &mut report).unwrap());
        assert!(engine.compare_in(&pair(1, 2), &pair(1, 2), &mut report).unwrap());

        // One failure per disproven call, first failure only within each
        let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".b", ".a"]);
    }

    #[test]
    fn test_free_function() {
        let options = EquivalencyOptions::default();
        assert!(equivalent(&pair(1, 2), &pair(1, 2), &options).unwrap().is_proven());
        assert!(!equivalent(&pair(1, 3), &pair(1, 2), &options).unwrap().is_proven());
    }

    #[test]
    fn test_depth_limit() {
        let engine = EquivalencyEngine::new(EquivalencyOptions::builder().max_depth(1).build().unwrap());
        let inner = Object::new("Inner").with("value", 1).into_value();
        let subject = Object::new("Outer").with("inner", inner.clone()).into_value();
        let expectation = Object::new("Outer")
            .with("inner", Object::new("Inner").with("value", 1).into_value())
            .into_value();

        let result = engine.compare(&subject, &expectation).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::DepthExceeded);
        assert_eq!(failure.path, ".inner");
        assert_eq!(
            failure.to_string(),
            "The maximum recursion depth of 1 was reached at root.inner."
        );

        let unlimited = EquivalencyEngine::new(
            EquivalencyOptions::builder().allowing_infinite_recursion().build().unwrap(),
        );
        assert!(unlimited.compare(&subject, &expectation).unwrap().is_proven());
    }

    #[test]
    fn test_empty_containers_at_depth_limit() {
        let engine = EquivalencyEngine::new(EquivalencyOptions::builder().max_depth(1).build().unwrap());
        let empty = |type_name: &str| {
            Object::new(type_name)
                .with("items", Vec::<i64>::new())
                .with("lookup", Value::map(Vec::<(String, Value)>::new()))
                .into_value()
        };
        assert!(engine.compare(&empty("Basket"), &empty("Basket")).unwrap().is_proven());

        let subject = Object::new("Basket").with("items", vec![1]).into_value();
        let expectation = Object::new("Basket").with("items", vec![1]).into_value();
        let result = engine.compare(&subject, &expectation).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::DepthExceeded);
        assert_eq!(failure.path, ".items");
    }

    #[test]
    fn test_self_reference_is_a_cyclic_failure() {
        let node = Object::new("Node").with("value", 1).into_ref();
        node.set("next", node.clone());

        let expectation = Object::new("Node")
            .with("value", 1)
            .with(
                "next",
                Object::new("Node")
                    .with("value", 1)
                    .with("next", Value::Null)
                    .into_value(),
            )
            .into_value();

        let engine = EquivalencyEngine::default();
        let result = engine.compare(&node, &expectation).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::CyclicReference);
        assert_eq!(failure.path, ".next");
        assert!(result.only_cyclic_failures());

        let ignoring = EquivalencyEngine::new(
            EquivalencyOptions::builder().ignoring_cyclic_references().build().unwrap(),
        );
        assert!(ignoring.compare(&node, &expectation).unwrap().is_proven());
        node.clear();
    }

    #[test]
    fn test_shared_object_in_siblings_is_not_a_cycle() {
        let shared = Object::new("Tag").with("name", "x").into_value();
        let subject = Object::new("Pair")
            .with("left", shared.clone())
            .with("right", shared)
            .into_value();
        let tag = || Object::new("Tag").with("name", "x").into_value();
        let expectation = Object::new("Pair").with("left", tag()).with("right", tag()).into_value();

        assert!(EquivalencyEngine::default()
            .compare(&subject, &expectation)
            .unwrap()
            .is_proven());
    }
}
