//! Collection equality.
//!
//! ## Ordered
//!
//! Items are compared index by index as `[i]`.
//!
//! ## Unordered
//!
//! 1. Index-aligned trial: if every item already matches its counterpart,
//!    the collection is proven without building a matching.
//! 2. Otherwise expectation items become predicates ("some subject item is
//!    equivalent to me") and subject items become elements, and the
//!    maximum matching solver pairs them up. Trials run against a scratch
//!    report on the active path, so cycles inside items are still caught.
//! 3. Each unmatched expectation item `j` is compared for real against the
//!    closest unmatched subject item (fewest trial failures) as `[j]`, which
//!    gives the failure a concrete path.

use tracing::trace;

use crate::engine::comparands::Comparands;
use crate::engine::report::{Failure, FailureKind, FailureMode, Report};
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;
use crate::error::EquivalencyError;
use crate::matching::solve_by;
use crate::path::{NodeId, Segment};
use crate::types::Value;

pub(super) fn handle(
    walker: &mut Walker<'_>,
    comparands: &Comparands<'_>,
    report: &mut Report,
) -> Result<StepResult, EquivalencyError> {
    let (actual, expected) = match (comparands.subject().as_seq(), comparands.expectation().as_seq()) {
        (None, None) => return Ok(StepResult::Inconclusive),
        (Some(actual), Some(expected)) => (actual, expected),
        _ => {
            return Ok(StepResult::Disproven(
                walker.failure(FailureKind::TypeMismatch, comparands),
            ))
        }
    };

    let node = comparands.node();
    if actual.len() != expected.len() {
        return Ok(StepResult::Disproven(Failure::new(
            FailureKind::LengthMismatch,
            walker.nodes().path(node),
            expected.len().to_string(),
            actual.len().to_string(),
        )));
    }

    let strict = walker.is_strict_ordering(node);
    walker.recurse(comparands, |walker| {
        if strict {
            compare_in_order(walker, actual, expected, node, report)?;
        } else {
            compare_in_any_order(walker, actual, expected, node, report)?;
        }
        Ok(StepResult::Delegated)
    })
}

fn compare_in_order(
    walker: &mut Walker<'_>,
    actual: &[Value],
    expected: &[Value],
    node: NodeId,
    report: &mut Report,
) -> Result<(), EquivalencyError> {
    for (index, (actual_item, expected_item)) in actual.iter().zip(expected).enumerate() {
        if report.should_stop() {
            break;
        }
        walker.compare_child(actual_item, expected_item, node, Segment::Index(index), report)?;
    }
    Ok(())
}

fn compare_in_any_order(
    walker: &mut Walker<'_>,
    actual: &[Value],
    expected: &[Value],
    node: NodeId,
    report: &mut Report,
) -> Result<(), EquivalencyError> {
    let mut aligned = true;
    for (index, (actual_item, expected_item)) in actual.iter().zip(expected).enumerate() {
        let failures = walker.trial(
            actual_item,
            expected_item,
            node,
            Segment::Index(index),
            FailureMode::FirstFailure,
        )?;
        if failures > 0 {
            aligned = false;
            break;
        }
    }
    if aligned {
        return Ok(());
    }

    let assignment = solve_by(expected.len(), actual.len(), |predicate, element| {
        walker
            .trial(
                &actual[element],
                &expected[predicate],
                node,
                Segment::Index(predicate),
                FailureMode::FirstFailure,
            )
            .map(|failures| failures == 0)
    })?;
    trace!(
        items = expected.len(),
        matched = assignment.len(),
        "collection_matched_in_any_order"
    );

    let mut remaining = assignment.unmatched_elements().to_vec();
    for &index in assignment.unmatched_predicates() {
        if report.should_stop() || remaining.is_empty() {
            break;
        }

        // Closest remaining subject item; ties go to the lowest index
        let mut closest = (usize::MAX, 0);
        for (position, &element) in remaining.iter().enumerate() {
            let failures = walker.trial(
                &actual[element],
                &expected[index],
                node,
                Segment::Index(index),
                FailureMode::AllFailures,
            )?;
            if failures < closest.0 {
                closest = (failures, position);
            }
        }

        let element = remaining.remove(closest.1);
        walker.compare_child(
            &actual[element],
            &expected[index],
            node,
            Segment::Index(index),
            report,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::{EquivalencyEngine, EquivalencyOptions, FailureKind};
    use crate::types::{Object, Value};

    fn line(sku: &str, quantity: i64) -> Value {
        Object::new("Line")
            .with("sku", sku)
            .with("quantity", quantity)
            .into_value()
    }

    #[test]
    fn test_any_order_by_default() {
        let engine = EquivalencyEngine::default();
        assert!(engine.compare(&[3, 1, 2], &[1, 2, 3]).unwrap().is_proven());

        let subject = Value::seq([line("b", 2), line("a", 1)]);
        let expectation = Value::seq([line("a", 1), line("b", 2)]);
        assert!(engine.compare(&subject, &expectation).unwrap().is_proven());
    }

    #[test]
    fn test_duplicates_are_consumed_once() {
        let engine = EquivalencyEngine::default();
        let result = engine.compare(&[1, 1, 2], &[1, 2, 2]).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::ValueMismatch);
        assert_eq!(failure.path, "[2]");
        assert_eq!(failure.expected, "2");
        assert_eq!(failure.actual, "1");
    }

    #[test]
    fn test_unmatched_item_reports_closest_candidate() {
        let engine = EquivalencyEngine::default();
        let subject = Value::seq([line("b", 2), line("a", 5)]);
        let expectation = Value::seq([line("a", 1), line("b", 2)]);

        let result = engine.compare(&subject, &expectation).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.path, "[0].quantity");
        assert_eq!(failure.expected, "1");
        assert_eq!(failure.actual, "5");
    }

    #[test]
    fn test_strict_ordering() {
        let engine = EquivalencyEngine::new(
            EquivalencyOptions::builder().with_strict_ordering().build().unwrap(),
        );
        assert!(engine.compare(&[1, 2, 3], &[1, 2, 3]).unwrap().is_proven());

        let result = engine.compare(&[3, 1, 2], &[1, 2, 3]).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.path, "[0]");
    }

    #[test]
    fn test_strict_ordering_for_one_path() {
        let engine = EquivalencyEngine::new(
            EquivalencyOptions::builder()
                .with_strict_ordering_for("steps")
                .build()
                .unwrap(),
        );
        let subject = Object::new("Recipe")
            .with("steps", vec![2, 1])
            .with("tags", vec!["b", "a"])
            .into_value();
        let expectation = Object::new("Recipe")
            .with("steps", vec![1, 2])
            .with("tags", vec!["a", "b"])
            .into_value();

        let result = engine.compare_all(&subject, &expectation).unwrap();
        let paths: Vec<&str> = result.failures().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".steps[0]", ".steps[1]"]);
    }

    #[test]
    fn test_length_and_shape() {
        let engine = EquivalencyEngine::default();
        let result = engine.compare(&[1, 2], &[1, 2, 3]).unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::LengthMismatch);
        assert_eq!(failure.to_string(), "Expected root to contain 3 item(s), but found 2.");

        let result = engine.compare(&1, &[1]).unwrap();
        assert_eq!(result.first_failure().unwrap().kind, FailureKind::TypeMismatch);
    }
}
