//! Member-wise object equality.
//!
//! The expectation drives the comparison: its selected members are looked
//! up by name on the subject and compared as `.name`. Extra subject members
//! are ignored unless [`MemberMatching::Symmetric`] is set.
//!
//! Objects without members, and nested objects when recursion into nested
//! objects is off, are left to the fallback step.

use tracing::{trace, warn};

use crate::engine::comparands::Comparands;
use crate::engine::members::MemberInfo;
use crate::engine::options::MemberMatching;
use crate::engine::report::{Failure, FailureKind, Report};
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;
use crate::error::EquivalencyError;
use crate::path::{NodeId, Segment};
use crate::types::Object;

/// Description of the subject side of a missing member.
const MISSING: &str = "<missing>";

pub(super) fn handle(
    walker: &mut Walker<'_>,
    comparands: &Comparands<'_>,
    report: &mut Report,
) -> Result<StepResult, EquivalencyError> {
    let (actual, expected) = match (comparands.subject().as_object(), comparands.expectation().as_object()) {
        (None, None) => return Ok(StepResult::Inconclusive),
        (Some(actual), Some(expected)) => (actual, expected),
        _ => {
            return Ok(StepResult::Disproven(
                walker.failure(FailureKind::TypeMismatch, comparands),
            ))
        }
    };

    let node = comparands.node();
    let settings = walker.options().settings();
    if !settings.recurse_nested && walker.depth(node) > 0 {
        return Ok(StepResult::Inconclusive);
    }
    if settings.strict_typing && actual.type_name() != expected.type_name() {
        return Ok(StepResult::Disproven(Failure::new(
            FailureKind::TypeMismatch,
            walker.nodes().path(node),
            expected.type_name(),
            actual.type_name(),
        )));
    }
    if expected.member_count() == 0 {
        return Ok(StepResult::Inconclusive);
    }

    let selected = walker.selected_members(expected, node);
    if selected.is_empty() {
        let path = walker.nodes().description(node);
        warn!(path = %path, type_name = expected.type_name(), "no_members_selected");
        return Err(EquivalencyError::NoMembersSelected {
            path,
            type_name: expected.type_name().to_string(),
        });
    }

    walker.recurse(comparands, |walker| {
        compare_members(walker, actual, expected, &selected, node, report)?;
        if settings.member_matching == MemberMatching::Symmetric && !report.should_stop() {
            report_unexpected_members(walker, actual, expected, node, report);
        }
        Ok(StepResult::Delegated)
    })
}

fn compare_members(
    walker: &mut Walker<'_>,
    actual: &Object,
    expected: &Object,
    selected: &[MemberInfo],
    node: NodeId,
    report: &mut Report,
) -> Result<(), EquivalencyError> {
    let ignore_missing = walker.options().settings().ignore_missing_members;
    let expected_members = expected.members();
    let actual_members = actual.members();

    for info in selected {
        if report.should_stop() {
            break;
        }
        let Some(expected_member) = expected_members.iter().find(|m| m.name == info.name) else {
            continue;
        };
        let segment = Segment::Member(info.name.clone());

        match actual_members.iter().find(|m| m.name == info.name) {
            Some(actual_member) => {
                walker.compare_child(
                    &actual_member.value,
                    &expected_member.value,
                    node,
                    segment,
                    report,
                )?;
            }
            None if ignore_missing => {
                trace!(member = %info.name, "missing_member_ignored");
            }
            None => report.push(Failure::new(
                FailureKind::MissingMember,
                walker.nodes().child_path(node, &segment),
                expected_member.value.describe(),
                MISSING,
            )),
        }
    }
    Ok(())
}

fn report_unexpected_members(
    walker: &Walker<'_>,
    actual: &Object,
    expected: &Object,
    node: NodeId,
    report: &mut Report,
) {
    for info in walker.selected_members(actual, node) {
        if report.should_stop() {
            break;
        }
        if expected.has_member(&info.name) {
            continue;
        }
        let described = actual
            .member(&info.name)
            .map(|value| value.describe())
            .unwrap_or_default();
        let segment = Segment::Member(info.name);
        report.push(Failure::new(
            FailureKind::UnexpectedMember,
            walker.nodes().child_path(node, &segment),
            MISSING,
            described,
        ));
    }
}
