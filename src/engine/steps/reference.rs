//! Reference and null short-circuits.

use crate::engine::comparands::Comparands;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let subject = comparands.subject();
    let expectation = comparands.expectation();

    match (subject.is_null(), expectation.is_null()) {
        (true, true) => StepResult::Proven,
        (false, false) => match subject.identity() {
            Some(id) if expectation.identity() == Some(id) => StepResult::Proven,
            _ => StepResult::Inconclusive,
        },
        _ => StepResult::Disproven(walker.failure(FailureKind::NullMismatch, comparands)),
    }
}
