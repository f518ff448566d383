//! "Each predicate is satisfied by a distinct item, in any order."
//!
//! Thin assertions over the solver. The solver never fails; these decide
//! which leftovers count as a failure.

use thiserror::Error;

use crate::matching::solver::{solve, Element, MatchAssignment, Predicate};

/// Predicates or items left unmatched by the best possible assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.unmatched_predicates, .unmatched_elements))]
pub struct SatisfyFailure {
    /// `(index, description)` of every predicate without an item
    pub unmatched_predicates: Vec<(usize, String)>,
    /// Indices of items no predicate was assigned to
    pub unmatched_elements: Vec<usize>,
    /// The maximum assignment that was found
    pub assignment: MatchAssignment,
}

fn describe(predicates: &[(usize, String)], elements: &[usize]) -> String {
    let mut message =
        String::from("Expected the collection to satisfy all predicates in any order");
    if !predicates.is_empty() {
        let listed: Vec<String> = predicates
            .iter()
            .map(|(index, description)| format!("[{index}] {description}"))
            .collect();
        message.push_str(&format!(
            ", but no distinct item matched predicate(s) {}",
            listed.join(", ")
        ));
    }
    if !elements.is_empty() {
        let separator = if predicates.is_empty() { ", but" } else { " and" };
        message.push_str(&format!(
            "{separator} item(s) at {elements:?} matched no predicate"
        ));
    }
    message.push('.');
    message
}

/// Every predicate must take a distinct item and every item must be taken.
pub fn satisfy<T>(
    items: &[T],
    predicates: &[Predicate<'_, T>],
) -> Result<MatchAssignment, SatisfyFailure> {
    check(items, predicates, true)
}

/// Every predicate must take a distinct item; extra items are allowed.
pub fn satisfy_any_order<T>(
    items: &[T],
    predicates: &[Predicate<'_, T>],
) -> Result<MatchAssignment, SatisfyFailure> {
    check(items, predicates, false)
}

fn check<T>(
    items: &[T],
    predicates: &[Predicate<'_, T>],
    require_all_items: bool,
) -> Result<MatchAssignment, SatisfyFailure> {
    let assignment = solve(predicates, &Element::enumerate(items));

    let unmatched_elements = if require_all_items {
        assignment.unmatched_elements().to_vec()
    } else {
        Vec::new()
    };
    if assignment.is_complete() && unmatched_elements.is_empty() {
        return Ok(assignment);
    }

    let unmatched_predicates = assignment
        .unmatched_predicates()
        .iter()
        .filter_map(|&index| predicates.iter().find(|p| p.index() == index))
        .map(|p| (p.index(), p.description().to_string()))
        .collect();
    Err(SatisfyFailure {
        unmatched_predicates,
        unmatched_elements,
        assignment,
    })
}
