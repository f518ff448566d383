//! Date and date-time equality.
//!
//! Exact: two date-times are equal only when they denote the same instant
//! with the same UTC offset. A date never equals a date-time.

use crate::engine::comparands::Comparands;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;
use crate::types::Value;

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let equal = match (comparands.subject(), comparands.expectation()) {
        (Value::DateTime(actual), Value::DateTime(expected)) => {
            actual == expected && actual.offset() == expected.offset()
        }
        (Value::Date(actual), Value::Date(expected)) => actual == expected,
        (actual, expected) if is_temporal(actual) || is_temporal(expected) => {
            return StepResult::Disproven(walker.failure(FailureKind::TypeMismatch, comparands));
        }
        _ => return StepResult::Inconclusive,
    };

    if equal {
        StepResult::Proven
    } else {
        StepResult::Disproven(walker.failure(FailureKind::ValueMismatch, comparands))
    }
}

fn is_temporal(value: &Value) -> bool {
    matches!(value, Value::DateTime(_) | Value::Date(_))
}
