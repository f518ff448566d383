//! Per-call walk state.
//!
//! A [`Walker`] owns everything that changes while one top-level comparison
//! runs: the node arena and the cycle guard. It borrows the options. Every
//! call builds a fresh walker, so two comparisons never share state.

use tracing::{debug, trace};

use crate::engine::comparands::Comparands;
use crate::engine::cycle::CycleGuard;
use crate::engine::members::{self, MemberInfo};
use crate::engine::options::{CyclicReferenceHandling, EquivalencyOptions};
use crate::engine::report::{Failure, FailureKind, FailureMode, Report};
use crate::engine::steps::{StepResult, PIPELINE};
use crate::error::EquivalencyError;
use crate::path::{NodeArena, NodeId, Segment};
use crate::types::{Object, Value};

/// Initial arena capacity; grows past this for deeper graphs.
const ARENA_CAPACITY: usize = 32;

pub(crate) struct Walker<'o> {
    options: &'o EquivalencyOptions,
    nodes: NodeArena,
    guard: CycleGuard,
}

impl<'o> Walker<'o> {
    pub(crate) fn new(options: &'o EquivalencyOptions) -> Self {
        Self {
            options,
            nodes: NodeArena::with_capacity(ARENA_CAPACITY),
            guard: CycleGuard::new(),
        }
    }

    #[inline]
    pub(crate) fn options(&self) -> &'o EquivalencyOptions {
        self.options
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub(crate) fn root(&mut self) -> NodeId {
        self.nodes.root()
    }

    pub(crate) fn release(&mut self, node: NodeId) {
        self.nodes.release(node);
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run the pipeline on one pair.
    ///
    /// Returns whether this node was proven; failures go to `report`.
    pub(crate) fn compare(
        &mut self,
        subject: &Value,
        expectation: &Value,
        node: NodeId,
        report: &mut Report,
    ) -> Result<bool, EquivalencyError> {
        let before = report.len();
        let mut comparands = Comparands::new(subject, expectation, node);

        for step in PIPELINE {
            match step.handle(self, &mut comparands, report)? {
                StepResult::Inconclusive => continue,
                StepResult::Proven => {
                    trace!(step = step.name(), path = %self.nodes.path(node), "step_proven");
                    return Ok(true);
                }
                StepResult::Disproven(failure) => {
                    trace!(
                        step = step.name(),
                        path = %failure.path,
                        kind = ?failure.kind,
                        "step_disproven"
                    );
                    report.push(failure);
                    return Ok(false);
                }
                StepResult::Delegated => {
                    trace!(step = step.name(), path = %self.nodes.path(node), "step_delegated");
                    return Ok(report.len() == before);
                }
            }
        }
        Ok(report.len() == before)
    }

    /// Enter a child node, compare, release it.
    pub(crate) fn compare_child(
        &mut self,
        subject: &Value,
        expectation: &Value,
        parent: NodeId,
        segment: Segment,
        report: &mut Report,
    ) -> Result<bool, EquivalencyError> {
        let node = self.nodes.child(parent, segment);
        let result = self.compare(subject, expectation, node, report);
        self.nodes.release(node);
        result
    }

    /// Compare a child against a scratch report and return its failure count.
    ///
    /// Shares the active path with the caller, so cycles through the trial
    /// are still detected. The caller's report is untouched.
    pub(crate) fn trial(
        &mut self,
        subject: &Value,
        expectation: &Value,
        parent: NodeId,
        segment: Segment,
        mode: FailureMode,
    ) -> Result<usize, EquivalencyError> {
        let mut scratch = Report::new(mode);
        self.compare_child(subject, expectation, parent, segment, &mut scratch)?;
        Ok(scratch.len())
    }

    // ========================================================================
    // Recursion Guard
    // ========================================================================

    /// Run `body` one level below `comparands`.
    ///
    /// Refuses when the node sits at the depth limit, or when the subject is
    /// an object already on the active path. Empty collections and maps have
    /// no children and are exempt from the depth limit. The subject's
    /// identity stays on the path for exactly the duration of `body`.
    pub(crate) fn recurse<F>(
        &mut self,
        comparands: &Comparands<'_>,
        body: F,
    ) -> Result<StepResult, EquivalencyError>
    where
        F: FnOnce(&mut Self) -> Result<StepResult, EquivalencyError>,
    {
        let node = comparands.node();
        let has_children = match comparands.subject() {
            Value::Seq(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            _ => true,
        };
        if let Some(max_depth) = self.options.settings().max_depth {
            if has_children && self.nodes.depth(node) >= max_depth {
                return Ok(StepResult::Disproven(Failure::new(
                    FailureKind::DepthExceeded,
                    self.nodes.path(node),
                    max_depth.to_string(),
                    comparands.subject().describe(),
                )));
            }
        }

        let identity = comparands.subject().identity();
        if let Some(id) = identity {
            if !self.guard.enter(id) {
                return Ok(self.cyclic_reference(comparands));
            }
        }
        let result = body(self);
        if let Some(id) = identity {
            self.guard.exit(id);
        }
        result
    }

    fn cyclic_reference(&self, comparands: &Comparands<'_>) -> StepResult {
        let path = self.nodes.path(comparands.node());
        match self.options.settings().cyclic_references {
            CyclicReferenceHandling::Fail => StepResult::Disproven(Failure::new(
                FailureKind::CyclicReference,
                path,
                comparands.expectation().describe(),
                comparands.subject().describe(),
            )),
            CyclicReferenceHandling::Ignore => {
                debug!(path = %path, "cyclic_reference_ignored");
                StepResult::Proven
            }
        }
    }

    // ========================================================================
    // Helpers for Steps
    // ========================================================================

    #[inline]
    pub(crate) fn depth(&self, node: NodeId) -> usize {
        self.nodes.depth(node)
    }

    pub(crate) fn is_strict_ordering(&self, node: NodeId) -> bool {
        self.options.is_strict_ordering(&self.nodes.segments(node))
    }

    /// Members of `object` selected for comparison at `node`.
    pub(crate) fn selected_members(&self, object: &Object, node: NodeId) -> Vec<MemberInfo> {
        let segments = self.nodes.segments(node);
        members::select_members(self.options, object, &segments, &self.nodes.path(node))
    }

    /// Failure at the comparands' node, describing both sides.
    pub(crate) fn failure(&self, kind: FailureKind, comparands: &Comparands<'_>) -> Failure {
        Failure::new(
            kind,
            self.nodes.path(comparands.node()),
            comparands.expectation().describe(),
            comparands.subject().describe(),
        )
    }
}
