//! Native equality. Terminates recursion for atomic values.

use crate::engine::comparands::Comparands;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let subject = comparands.subject();
    let expectation = comparands.expectation();
    if subject == expectation {
        return StepResult::Proven;
    }

    let (actual, expected) = (subject.kind(), expectation.kind());
    let kind = if actual != expected && !(actual.is_numeric() && expected.is_numeric()) {
        FailureKind::TypeMismatch
    } else {
        FailureKind::ValueMismatch
    };
    StepResult::Disproven(walker.failure(kind, comparands))
}
