//! Maximum bipartite matching between predicates and elements.
//!
//! ## Algorithm
//!
//! Predicates are processed one at a time in input order. For each one a
//! breadth-first search runs over the bipartite graph:
//!
//! 1. Elements the predicate accepts are visited; a free one ends the search
//! 2. A taken element enqueues the predicate that holds it, which may move
//!    to another element it accepts
//! 3. Reaching a free element through such a chain yields an augmenting
//!    path, applied all at once
//!
//! Each element is visited at most once per search. A predicate with no
//! augmenting path stays unmatched; earlier predicates only ever move along
//! augmenting paths, so they never lose their match.
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Solve | O(P · (P + E)) searches over cached adjacency |
//! | Oracle calls | at most P · E, each pair evaluated once |
//!
//! ## Example
//!
//! ```
//! use deep_equivalency::matching::{solve, Element, PredicateSet};
//!
//! let items = [1, 2, 3];
//! let predicates = PredicateSet::new()
//!     .with("x > 2", |x: &i32| *x > 2)
//!     .with("x < 2", |x: &i32| *x < 2)
//!     .into_vec();
//!
//! let assignment = solve(&predicates, &Element::enumerate(&items));
//! assert_eq!(assignment.element_for(0), Some(2));
//! assert_eq!(assignment.element_for(1), Some(0));
//! assert_eq!(assignment.unmatched_elements(), &[1]);
//! assert!(assignment.unmatched_predicates().is_empty());
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use std::fmt;

use tracing::{debug, trace};

// ============================================================================
// Predicate and Element
// ============================================================================

/// A condition on one element, tagged with its position in the caller's list.
pub struct Predicate<'a, T: ?Sized> {
    index: usize,
    description: String,
    test: Box<dyn Fn(&T) -> bool + 'a>,
}

impl<'a, T: ?Sized> Predicate<'a, T> {
    pub fn new<F>(index: usize, description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        Self {
            index,
            description: description.into(),
            test: Box::new(test),
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn matches(&self, value: &T) -> bool {
        (self.test)(value)
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("index", &self.index)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Builds predicates with consecutive indices.
pub struct PredicateSet<'a, T: ?Sized> {
    predicates: Vec<Predicate<'a, T>>,
}

impl<'a, T: ?Sized> PredicateSet<'a, T> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    pub fn with<F>(mut self, description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        let index = self.predicates.len();
        self.predicates.push(Predicate::new(index, description, test));
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn into_vec(self) -> Vec<Predicate<'a, T>> {
        self.predicates
    }
}

impl<T: ?Sized> Default for PredicateSet<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed value tagged with its position in the caller's collection.
#[derive(Debug)]
pub struct Element<'a, T> {
    index: usize,
    value: &'a T,
}

// Manual impls: derives would require `T: Clone`
impl<T> Clone for Element<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Element<'_, T> {}

impl<'a, T> Element<'a, T> {
    pub fn new(index: usize, value: &'a T) -> Self {
        Self { index, value }
    }

    /// Wrap every item of a slice with its position.
    pub fn enumerate(items: &'a [T]) -> Vec<Self> {
        items
            .iter()
            .enumerate()
            .map(|(index, value)| Self::new(index, value))
            .collect()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn value(&self) -> &'a T {
        self.value
    }
}

// ============================================================================
// MatchAssignment
// ============================================================================

/// A 1-to-1 partial matching, keyed by the caller's original indices.
///
/// Built once by the solver and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchAssignment {
    /// Key: predicate index, Value: element index
    pairs: BTreeMap<usize, usize>,
    unmatched_predicates: Vec<usize>,
    unmatched_elements: Vec<usize>,
}

impl MatchAssignment {
    /// Number of matched pairs
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn element_for(&self, predicate: usize) -> Option<usize> {
        self.pairs.get(&predicate).copied()
    }

    pub fn predicate_for(&self, element: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find_map(|(&p, &e)| (e == element).then_some(p))
    }

    /// `(predicate, element)` pairs in predicate order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|(&p, &e)| (p, e))
    }

    pub fn unmatched_predicates(&self) -> &[usize] {
        &self.unmatched_predicates
    }

    pub fn unmatched_elements(&self) -> &[usize] {
        &self.unmatched_elements
    }

    /// Every predicate found an element.
    pub fn is_complete(&self) -> bool {
        self.unmatched_predicates.is_empty()
    }

    /// Every predicate and every element is matched.
    pub fn is_perfect(&self) -> bool {
        self.unmatched_predicates.is_empty() && self.unmatched_elements.is_empty()
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Maximum matching between `predicates` and `elements`.
///
/// Indices in the result are the ones carried by the predicates and elements.
pub fn solve<T>(predicates: &[Predicate<'_, T>], elements: &[Element<'_, T>]) -> MatchAssignment {
    let result: Result<MatchAssignment, Infallible> =
        solve_by(predicates.len(), elements.len(), |p, e| {
            Ok(predicates[p].matches(elements[e].value()))
        });
    let positional = match result {
        Ok(assignment) => assignment,
        Err(never) => match never {},
    };

    MatchAssignment {
        pairs: positional
            .pairs()
            .map(|(p, e)| (predicates[p].index(), elements[e].index()))
            .collect(),
        unmatched_predicates: positional
            .unmatched_predicates()
            .iter()
            .map(|&p| predicates[p].index())
            .collect(),
        unmatched_elements: positional
            .unmatched_elements()
            .iter()
            .map(|&e| elements[e].index())
            .collect(),
    }
}

/// Maximum matching over positions `0..predicate_count` × `0..element_count`.
///
/// `accepts(p, e)` says whether predicate `p` accepts element `e`. It is
/// called lazily and at most once per pair; the first error aborts the solve.
pub fn solve_by<E, F>(
    predicate_count: usize,
    element_count: usize,
    mut accepts: F,
) -> Result<MatchAssignment, E>
where
    F: FnMut(usize, usize) -> Result<bool, E>,
{
    let mut adjacency: Vec<Option<Vec<usize>>> = vec![None; predicate_count];
    let mut predicate_match: Vec<Option<usize>> = vec![None; predicate_count];
    let mut element_owner: Vec<Option<usize>> = vec![None; element_count];

    if element_count > 0 {
        for predicate in 0..predicate_count {
            let mut visited = vec![false; element_count];
            // Key: element, Value: predicate that reached it
            let mut reached_from: Vec<Option<usize>> = vec![None; element_count];
            let mut queue = VecDeque::from([predicate]);
            let mut free = None;

            'search: while let Some(current) = queue.pop_front() {
                if adjacency[current].is_none() {
                    let mut accepted = Vec::new();
                    for element in 0..element_count {
                        if accepts(current, element)? {
                            accepted.push(element);
                        }
                    }
                    adjacency[current] = Some(accepted);
                }
                let neighbors = adjacency[current].as_deref().unwrap_or_default();

                for &element in neighbors {
                    if visited[element] {
                        continue;
                    }
                    visited[element] = true;
                    reached_from[element] = Some(current);
                    match element_owner[element] {
                        None => {
                            free = Some(element);
                            break 'search;
                        }
                        Some(owner) => queue.push_back(owner),
                    }
                }
            }

            if let Some(element) = free {
                let length = augment(element, &reached_from, &mut predicate_match, &mut element_owner);
                trace!(predicate, length, "augmenting_path_applied");
            }
        }
    }

    let assignment = MatchAssignment {
        pairs: predicate_match
            .iter()
            .enumerate()
            .filter_map(|(p, e)| e.map(|e| (p, e)))
            .collect(),
        unmatched_predicates: (0..predicate_count)
            .filter(|&p| predicate_match[p].is_none())
            .collect(),
        unmatched_elements: (0..element_count)
            .filter(|&e| element_owner[e].is_none())
            .collect(),
    };
    debug!(
        matched = assignment.len(),
        predicates = predicate_count,
        elements = element_count,
        "matching_solved"
    );
    Ok(assignment)
}

/// Flip the path ending at the free `element`, returning its length in edges.
fn augment(
    mut element: usize,
    reached_from: &[Option<usize>],
    predicate_match: &mut [Option<usize>],
    element_owner: &mut [Option<usize>],
) -> usize {
    let mut length = 0;
    while let Some(predicate) = reached_from[element] {
        let previous = predicate_match[predicate];
        predicate_match[predicate] = Some(element);
        element_owner[element] = Some(predicate);
        length += 1;
        match previous {
            Some(released) => element = released,
            None => break,
        }
    }
    length
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_ints(items: &[i32], predicates: PredicateSet<'_, i32>) -> MatchAssignment {
        solve(&predicates.into_vec(), &Element::enumerate(items))
    }

    #[test]
    fn test_each_predicate_takes_a_distinct_element() {
        let assignment = solve_ints(
            &[1, 2, 3],
            PredicateSet::new()
                .with("x > 2", |x: &i32| *x > 2)
                .with("x < 2", |x: &i32| *x < 2),
        );
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.element_for(0), Some(2));
        assert_eq!(assignment.element_for(1), Some(0));
        assert_eq!(assignment.predicate_for(2), Some(0));
        assert_eq!(assignment.unmatched_elements(), &[1]);
        assert!(assignment.is_complete());
        assert!(!assignment.is_perfect());
    }

    #[test]
    fn test_more_predicates_than_elements() {
        let assignment = solve_ints(
            &[1, 1],
            PredicateSet::new()
                .with("x == 1", |x: &i32| *x == 1)
                .with("x == 1", |x: &i32| *x == 1)
                .with("x == 1", |x: &i32| *x == 1),
        );
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.unmatched_predicates(), &[2]);
        assert!(assignment.unmatched_elements().is_empty());
    }

    #[test]
    fn test_augmenting_path_moves_earlier_predicate() {
        // Greedy would give "any" element 0 and leave "small" without a match
        let assignment = solve_ints(
            &[1, 5],
            PredicateSet::new()
                .with("any", |_: &i32| true)
                .with("small", |x: &i32| *x < 3),
        );
        assert!(assignment.is_perfect());
        assert_eq!(assignment.element_for(0), Some(1));
        assert_eq!(assignment.element_for(1), Some(0));
    }

    #[test]
    fn test_empty_inputs() {
        let assignment = solve_ints(&[], PredicateSet::new().with("any", |_: &i32| true));
        assert!(assignment.is_empty());
        assert_eq!(assignment.unmatched_predicates(), &[0]);

        let assignment = solve_ints(&[1, 2], PredicateSet::new());
        assert!(assignment.is_empty());
        assert_eq!(assignment.unmatched_elements(), &[0, 1]);
    }

    #[test]
    fn test_original_indices_are_reported() {
        let items = [10, 20];
        let elements = vec![Element::new(7, &items[0]), Element::new(9, &items[1])];
        let predicates = vec![Predicate::new(4, "x == 20", |x: &i32| *x == 20)];

        let assignment = solve(&predicates, &elements);
        assert_eq!(assignment.element_for(4), Some(9));
        assert_eq!(assignment.unmatched_elements(), &[7]);
    }

    #[test]
    fn test_oracle_called_once_per_pair_and_errors_propagate() {
        let mut calls = 0;
        let assignment = solve_by::<(), _>(3, 3, |_, _| {
            calls += 1;
            Ok(true)
        })
        .unwrap();
        assert!(assignment.is_perfect());
        assert!(calls <= 9);

        let result = solve_by(2, 2, |p, _| if p == 1 { Err("boom") } else { Ok(true) });
        assert_eq!(result, Err("boom"));
    }
}
