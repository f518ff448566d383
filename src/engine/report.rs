//! Structured failures and the reporting context.
//!
//! ## Reporting Context
//!
//! A [`Report`] is passed explicitly through every comparison. It carries the
//! caller's failure mode and an optional "because" reason, and collects
//! [`Failure`]s as branches are disproven:
//!
//! - [`FailureMode::FirstFailure`]: the walk stops descending into new
//!   siblings as soon as one failure has been recorded
//! - [`FailureMode::AllFailures`]: every branch is walked and all failures
//!   are returned together
//!
//! Failures are structured data. `Display` renders a default English
//! message; callers that need other wording format the fields themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What went wrong at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Subject and expectation have incompatible shapes
    TypeMismatch,
    /// Exactly one side is null
    NullMismatch,
    /// The expectation has a member the subject lacks
    MissingMember,
    /// The subject has a member the expectation lacks (symmetric matching only)
    UnexpectedMember,
    /// Collections or dictionaries differ in size
    LengthMismatch,
    /// A dictionary key of the expectation is absent from the subject
    MissingKey,
    /// Two leaves are not equal
    ValueMismatch,
    /// The subject refers back to an object already on the active path
    CyclicReference,
    /// The walk went deeper than the configured maximum
    DepthExceeded,
}

impl FailureKind {
    /// Shape failures: terminal for the branch, reported with the offending path.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            FailureKind::TypeMismatch
                | FailureKind::NullMismatch
                | FailureKind::MissingMember
                | FailureKind::UnexpectedMember
                | FailureKind::LengthMismatch
                | FailureKind::MissingKey
        )
    }

    #[inline]
    pub fn is_cyclic(self) -> bool {
        self == FailureKind::CyclicReference
    }
}

/// One disproven node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Rendered node path, e.g. `.orders[2].total`; empty for the root
    pub path: String,
    pub kind: FailureKind,
    /// Description of the expectation side
    pub expected: String,
    /// Description of the subject side
    pub actual: String,
    /// Caller-supplied reason, copied from the report
    pub reason: Option<String>,
}

impl Failure {
    pub fn new(
        kind: FailureKind,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            expected: expected.into(),
            actual: actual.into(),
            reason: None,
        }
    }

    /// Path prefixed with `root`.
    pub fn subject_path(&self) -> String {
        format!("root{}", self.path)
    }

    fn because(&self) -> String {
        match self.reason.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(reason) if reason.starts_with("because") => format!(" {reason}"),
            Some(reason) => format!(" because {reason}"),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self.subject_path();
        let because = self.because();
        match self.kind {
            FailureKind::TypeMismatch | FailureKind::NullMismatch | FailureKind::ValueMismatch => {
                write!(
                    f,
                    "Expected {subject} to be {}{because}, but found {}.",
                    self.expected, self.actual
                )
            }
            FailureKind::MissingMember => write!(
                f,
                "Expectation has member {subject} that the other object does not have{because}."
            ),
            FailureKind::UnexpectedMember => write!(
                f,
                "Subject has member {subject} that the expectation does not have{because}."
            ),
            FailureKind::LengthMismatch => write!(
                f,
                "Expected {subject} to contain {} item(s){because}, but found {}.",
                self.expected, self.actual
            ),
            FailureKind::MissingKey => write!(
                f,
                "Expected {subject} to contain key {}{because}, but it has keys {}.",
                self.expected, self.actual
            ),
            FailureKind::CyclicReference => write!(
                f,
                "Expected {subject} to be {}{because}, but found a cyclic reference to {}.",
                self.expected, self.actual
            ),
            FailureKind::DepthExceeded => write!(
                f,
                "The maximum recursion depth of {} was reached at {subject}{because}.",
                self.expected
            ),
        }
    }
}

/// Whether a comparison stops at the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    #[default]
    FirstFailure,
    AllFailures,
}

/// Reporting context threaded through a comparison.
#[derive(Debug, Clone, Default)]
pub struct Report {
    mode: FailureMode,
    reason: Option<String>,
    failures: Vec<Failure>,
}

impl Report {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            reason: None,
            failures: Vec::new(),
        }
    }

    pub fn first_failure() -> Self {
        Self::new(FailureMode::FirstFailure)
    }

    pub fn all_failures() -> Self {
        Self::new(FailureMode::AllFailures)
    }

    /// Attach a reason to every failure recorded from now on.
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Record a failure.
    pub fn push(&mut self, mut failure: Failure) {
        if failure.reason.is_none() {
            failure.reason = self.reason.clone();
        }
        self.failures.push(failure);
    }

    /// True once no further siblings should be walked.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.mode == FailureMode::FirstFailure && !self.failures.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// An empty report with the same mode and reason.
    ///
    /// Each top-level comparison walks into one of these, so failures left
    /// by earlier comparisons never stop a later walk early.
    pub(crate) fn scoped(&self) -> Self {
        Self {
            mode: self.mode,
            reason: self.reason.clone(),
            failures: Vec::new(),
        }
    }

    /// Move every failure of `other` into this report.
    pub(crate) fn append(&mut self, other: Report) {
        for failure in other.failures {
            self.push(failure);
        }
    }

    /// Drop failures recorded after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.failures.truncate(len);
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}

/// Outcome of a top-level comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EquivalencyResult {
    failures: Vec<Failure>,
}

impl EquivalencyResult {
    pub fn new(failures: Vec<Failure>) -> Self {
        Self { failures }
    }

    #[inline]
    pub fn is_proven(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn first_failure(&self) -> Option<&Failure> {
        self.failures.first()
    }

    /// True if every failure is a cyclic reference.
    ///
    /// Lets callers decide to tolerate cycles after the fact.
    pub fn only_cyclic_failures(&self) -> bool {
        !self.failures.is_empty() && self.failures.iter().all(|f| f.kind.is_cyclic())
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    /// `Ok(())` when proven, the failures otherwise.
    pub fn into_result(self) -> Result<(), Vec<Failure>> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self.failures)
        }
    }
}

impl fmt::Display for EquivalencyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("equivalent");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        let failure = Failure::new(FailureKind::ValueMismatch, ".b", "2", "3");
        assert_eq!(failure.to_string(), "Expected root.b to be 2, but found 3.");

        let failure = Failure::new(FailureKind::MissingMember, ".total", "12", "<missing>");
        assert_eq!(
            failure.to_string(),
            "Expectation has member root.total that the other object does not have."
        );

        let failure = Failure::new(FailureKind::LengthMismatch, ".items", "3", "2");
        assert_eq!(
            failure.to_string(),
            "Expected root.items to contain 3 item(s), but found 2."
        );

        let failure = Failure::new(FailureKind::DepthExceeded, ".a.b", "1", "");
        assert_eq!(
            failure.to_string(),
            "The maximum recursion depth of 1 was reached at root.a.b."
        );
    }

    #[test]
    fn test_reason_is_attached() {
        let mut report = Report::first_failure().because("totals must match");
        report.push(Failure::new(FailureKind::ValueMismatch, "", "2", "3"));

        let failure = &report.failures()[0];
        assert_eq!(failure.reason.as_deref(), Some("totals must match"));
        assert_eq!(
            failure.to_string(),
            "Expected root to be 2 because totals must match, but found 3."
        );

        let mut report = Report::first_failure().because("because it is required");
        report.push(Failure::new(FailureKind::ValueMismatch, "", "2", "3"));
        assert_eq!(
            report.failures()[0].to_string(),
            "Expected root to be 2 because it is required, but found 3."
        );
    }

    #[test]
    fn test_should_stop_depends_on_mode() {
        let mut first = Report::first_failure();
        let mut all = Report::all_failures();
        assert!(!first.should_stop());

        first.push(Failure::new(FailureKind::ValueMismatch, "", "1", "2"));
        all.push(Failure::new(FailureKind::ValueMismatch, "", "1", "2"));
        assert!(first.should_stop());
        assert!(!all.should_stop());

        all.truncate(0);
        assert!(all.is_empty());
    }

    #[test]
    fn test_kind_categories() {
        assert!(FailureKind::MissingMember.is_structural());
        assert!(FailureKind::LengthMismatch.is_structural());
        assert!(!FailureKind::ValueMismatch.is_structural());
        assert!(!FailureKind::CyclicReference.is_structural());
        assert!(FailureKind::CyclicReference.is_cyclic());
    }

    #[test]
    fn test_result_accessors() {
        let proven = EquivalencyResult::default();
        assert!(proven.is_proven());
        assert_eq!(proven.to_string(), "equivalent");
        assert!(proven.clone().into_result().is_ok());
        assert!(!proven.only_cyclic_failures());

        let cyclic = EquivalencyResult::new(vec![Failure::new(
            FailureKind::CyclicReference,
            ".next",
            "Node {..}",
            "Node {..}",
        )]);
        assert!(!cyclic.is_proven());
        assert!(cyclic.only_cyclic_failures());
        assert_eq!(cyclic.first_failure().map(|f| f.path.as_str()), Some(".next"));
        assert_eq!(cyclic.into_result().unwrap_err().len(), 1);
    }
}
