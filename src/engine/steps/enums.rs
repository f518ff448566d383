//! Enum constant equality, by discriminant or by name.

use crate::engine::comparands::Comparands;
use crate::engine::options::EnumHandling;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;
use crate::types::{EnumValue, Value};

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let handling = walker.options().settings().enums;
    let equal = match (comparands.subject(), comparands.expectation()) {
        (Value::Enum(actual), Value::Enum(expected)) => match handling {
            EnumHandling::ByValue => actual.discriminant == expected.discriminant,
            EnumHandling::ByName => actual.name == expected.name,
        },
        (Value::Enum(constant), number) | (number, Value::Enum(constant))
            if handling == EnumHandling::ByValue =>
        {
            match discriminant_of(number) {
                Some(discriminant) => discriminant == constant.discriminant,
                None => return type_mismatch(walker, comparands),
            }
        }
        (Value::Enum(_), _) | (_, Value::Enum(_)) => return type_mismatch(walker, comparands),
        _ => return StepResult::Inconclusive,
    };

    if equal {
        StepResult::Proven
    } else {
        StepResult::Disproven(walker.failure(FailureKind::ValueMismatch, comparands))
    }
}

fn discriminant_of(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::UInt(u) => i64::try_from(*u).ok(),
        Value::Enum(EnumValue { discriminant, .. }) => Some(*discriminant),
        _ => None,
    }
}

fn type_mismatch(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    StepResult::Disproven(walker.failure(FailureKind::TypeMismatch, comparands))
}
