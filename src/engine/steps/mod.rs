//! The step pipeline.
//!
//! ## Ordering
//!
//! Steps run in the fixed order of [`PIPELINE`]. Each one either concludes
//! the node or declines it, and the first step that concludes wins:
//!
//! | # | Step | Handles |
//! |---|------|---------|
//! | 1 | [`Step::Custom`] | expectations a registered comparer applies to |
//! | 2 | [`Step::Conversion`] | rewrites the subject, never concludes |
//! | 3 | [`Step::Reference`] | same object, null on either side |
//! | 4 | [`Step::Strings`] | strings |
//! | 5 | [`Step::Temporal`] | dates and date-times |
//! | 6 | [`Step::Enums`] | enum constants |
//! | 7 | [`Step::Dictionary`] | string-keyed maps (recursive) |
//! | 8 | [`Step::Collection`] | sequences (recursive) |
//! | 9 | [`Step::Structural`] | objects, member by member (recursive) |
//! | 10 | [`Step::Fallback`] | native equality, always concludes |
//!
//! Recursive steps hand the verdict to their children: they return
//! [`StepResult::Delegated`] and the node is proven iff no child recorded a
//! failure.

mod collection;
mod conversion;
mod custom;
mod dictionary;
mod enums;
mod fallback;
mod reference;
mod strings;
mod structural;
mod temporal;

use crate::engine::comparands::Comparands;
use crate::engine::report::{Failure, Report};
use crate::engine::walker::Walker;
use crate::error::EquivalencyError;

/// What a step decided for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// The node is equivalent
    Proven,
    /// The node is not equivalent
    Disproven(Failure),
    /// Children were compared; their failures decide the node
    Delegated,
    /// Not this step's concern; try the next one
    Inconclusive,
}

/// A comparison strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Custom,
    Conversion,
    Reference,
    Strings,
    Temporal,
    Enums,
    Dictionary,
    Collection,
    Structural,
    Fallback,
}

/// Steps in the order they are tried.
pub const PIPELINE: [Step; 10] = [
    Step::Custom,
    Step::Conversion,
    Step::Reference,
    Step::Strings,
    Step::Temporal,
    Step::Enums,
    Step::Dictionary,
    Step::Collection,
    Step::Structural,
    Step::Fallback,
];

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::Custom => "custom",
            Step::Conversion => "conversion",
            Step::Reference => "reference",
            Step::Strings => "strings",
            Step::Temporal => "temporal",
            Step::Enums => "enums",
            Step::Dictionary => "dictionary",
            Step::Collection => "collection",
            Step::Structural => "structural",
            Step::Fallback => "fallback",
        }
    }

    /// True for the steps that walk into children.
    pub fn is_recursive(self) -> bool {
        matches!(self, Step::Dictionary | Step::Collection | Step::Structural)
    }

    pub(crate) fn handle(
        self,
        walker: &mut Walker<'_>,
        comparands: &mut Comparands<'_>,
        report: &mut Report,
    ) -> Result<StepResult, EquivalencyError> {
        match self {
            Step::Custom => Ok(custom::handle(walker, comparands)),
            Step::Conversion => {
                conversion::handle(walker.options(), comparands);
                Ok(StepResult::Inconclusive)
            }
            Step::Reference => Ok(reference::handle(walker, comparands)),
            Step::Strings => Ok(strings::handle(walker, comparands)),
            Step::Temporal => Ok(temporal::handle(walker, comparands)),
            Step::Enums => Ok(enums::handle(walker, comparands)),
            Step::Dictionary => dictionary::handle(walker, comparands, report),
            Step::Collection => collection::handle(walker, comparands, report),
            Step::Structural => structural::handle(walker, comparands, report),
            Step::Fallback => Ok(fallback::handle(walker, comparands)),
        }
    }
}
