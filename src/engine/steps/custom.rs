//! Caller-registered comparers.
//!
//! Runs before every built-in step, on the unconverted subject, so a
//! comparer fully replaces the default behavior for the values it claims.

use crate::engine::comparands::Comparands;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let Some(comparer) = walker.options().comparer_for(comparands.expectation()) else {
        return StepResult::Inconclusive;
    };
    if comparer.compare(comparands.subject(), comparands.expectation()) {
        StepResult::Proven
    } else {
        StepResult::Disproven(walker.failure(FailureKind::ValueMismatch, comparands))
    }
}
