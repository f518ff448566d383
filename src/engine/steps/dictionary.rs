//! String-keyed dictionary equality.
//!
//! Sizes must agree first. Then every key of the expectation must exist on
//! the subject, and the values under each key are compared as `[key]`.

use crate::engine::comparands::Comparands;
use crate::engine::report::{Failure, FailureKind, Report};
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;
use crate::error::EquivalencyError;
use crate::path::Segment;

pub(super) fn handle(
    walker: &mut Walker<'_>,
    comparands: &Comparands<'_>,
    report: &mut Report,
) -> Result<StepResult, EquivalencyError> {
    let (actual, expected) = match (comparands.subject().as_map(), comparands.expectation().as_map()) {
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

    walker.recurse(comparands, |walker| {
        for (key, expected_value) in expected {
            if report.should_stop() {
                break;
            }
            match actual.get(key) {
                Some(actual_value) => {
                    walker.compare_child(
                        actual_value,
                        expected_value,
                        node,
                        Segment::Key(key.clone()),
                        report,
                    )?;
                }
                None => {
                    let keys: Vec<&String> = actual.keys().collect();
                    report.push(Failure::new(
                        FailureKind::MissingKey,
                        walker.nodes().path(node),
                        format!("{key:?}"),
                        format!("{keys:?}"),
                    ));
                }
            }
        }
        Ok(StepResult::Delegated)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::engine::{EquivalencyEngine, FailureKind};
    use crate::types::Value;

    fn prices(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_equal_dictionaries() {
        let engine = EquivalencyEngine::default();
        let a = prices(&[("apple", 3), ("pear", 4)]);
        assert!(engine.compare(&a, &a.clone()).unwrap().is_proven());
    }

    #[test]
    fn test_value_mismatch_under_key() {
        let engine = EquivalencyEngine::default();
        let result = engine
            .compare(&prices(&[("apple", 3), ("pear", 5)]), &prices(&[("apple", 3), ("pear", 4)]))
            .unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.path, "[pear]");
        assert_eq!(failure.kind, FailureKind::ValueMismatch);
    }

    #[test]
    fn test_missing_key_and_count() {
        let engine = EquivalencyEngine::default();
        let result = engine
            .compare(&prices(&[("apple", 3), ("plum", 4)]), &prices(&[("apple", 3), ("pear", 4)]))
            .unwrap();
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::MissingKey);
        assert_eq!(
            failure.to_string(),
            r#"Expected root to contain key "pear", but it has keys ["apple", "plum"]."#
        );

        let result = engine
            .compare(&prices(&[("apple", 3)]), &prices(&[("apple", 3), ("pear", 4)]))
            .unwrap();
        assert_eq!(result.first_failure().unwrap().kind, FailureKind::LengthMismatch);
    }

    #[test]
    fn test_dictionary_against_collection() {
        let engine = EquivalencyEngine::default();
        let result = engine
            .compare(&Value::seq([1, 2]), &prices(&[("apple", 3)]))
            .unwrap();
        assert_eq!(result.first_failure().unwrap().kind, FailureKind::TypeMismatch);
    }
}
