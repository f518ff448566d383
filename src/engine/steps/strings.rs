//! String equality.
//!
//! Ordinal by default. [`StringOptions`] relax it; both sides are normalized
//! the same way before comparing, and failures still show the original text.

use crate::engine::comparands::Comparands;
use crate::engine::options::StringOptions;
use crate::engine::report::FailureKind;
use crate::engine::steps::StepResult;
use crate::engine::walker::Walker;

pub(super) fn handle(walker: &Walker<'_>, comparands: &Comparands<'_>) -> StepResult {
    let options = &walker.options().settings().strings;
    match (comparands.subject().as_str(), comparands.expectation().as_str()) {
        (None, None) => StepResult::Inconclusive,
        (Some(actual), Some(expected)) => {
            if strings_equal(actual, expected, options) {
                StepResult::Proven
            } else {
                StepResult::Disproven(walker.failure(FailureKind::ValueMismatch, comparands))
            }
        }
        _ => StepResult::Disproven(walker.failure(FailureKind::TypeMismatch, comparands)),
    }
}

fn strings_equal(actual: &str, expected: &str, options: &StringOptions) -> bool {
    if actual == expected {
        return true;
    }
    if *options == StringOptions::default() {
        return false;
    }
    normalize(actual, options) == normalize(expected, options)
}

fn normalize(text: &str, options: &StringOptions) -> String {
    let mut text = if options.ignore_newline_style {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    };
    if options.ignore_leading_whitespace {
        text = text.trim_start().to_string();
    }
    if options.ignore_trailing_whitespace {
        text = text.trim_end().to_string();
    }
    if options.ignore_case {
        text = text.to_lowercase();
    }
    text
}
