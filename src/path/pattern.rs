//! Member path patterns used by inclusion, exclusion and ordering rules.
//!
//! ## Syntax
//!
//! ```text
//! customer.name          member chain (a leading '.' is optional)
//! orders[2].total        a specific collection index
//! orders[*].total        any index (also written orders[].total)
//! lookup[eu]             a dictionary key
//! ```
//!
//! Numeric brackets match both collection indices and dictionary keys with
//! the same text.

use std::fmt;

use crate::error::EquivalencyError;
use crate::path::Segment;

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    Member(String),
    Index(usize),
    Key(String),
    AnyIndex,
}

impl PatternSegment {
    fn matches(&self, segment: &Segment) -> bool {
        match (self, segment) {
            (PatternSegment::Member(a), Segment::Member(b)) => a == b,
            (PatternSegment::Index(a), Segment::Index(b)) => a == b,
            (PatternSegment::Index(a), Segment::Key(b)) => a.to_string() == *b,
            (PatternSegment::Key(a), Segment::Key(b)) => a == b,
            (PatternSegment::AnyIndex, Segment::Index(_) | Segment::Key(_)) => true,
            _ => false,
        }
    }
}

/// A parsed member path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EquivalencyError::InvalidPathPattern`] for empty patterns,
    /// empty member names and unterminated brackets.
    ///
    /// # Example
    ///
    /// ```
    /// use deep_equivalency::path::PathPattern;
    ///
    /// let pattern = PathPattern::parse("orders[*].total").unwrap();
    /// assert_eq!(pattern.len(), 3);
    /// assert!(PathPattern::parse("orders[").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, EquivalencyError> {
        let invalid = |reason: &str| EquivalencyError::InvalidPathPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        let body = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let mut segments = Vec::new();
        let mut rest = body;
        let mut expect_member = true;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| invalid("unterminated index"))?;
                let inner = after[..close].trim();
                segments.push(match inner {
                    "" | "*" => PatternSegment::AnyIndex,
                    _ => match inner.parse::<usize>() {
                        Ok(index) => PatternSegment::Index(index),
                        Err(_) => PatternSegment::Key(inner.to_string()),
                    },
                });
                rest = &after[close + 1..];
                expect_member = false;
                continue;
            }

            if !expect_member {
                rest = rest
                    .strip_prefix('.')
                    .ok_or_else(|| invalid("expected '.' or '[' between segments"))?;
            }
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() {
                return Err(invalid("empty member name"));
            }
            if name.contains(']') {
                return Err(invalid("unexpected ']'"));
            }
            segments.push(PatternSegment::Member(name.to_string()));
            rest = &rest[end..];
            expect_member = false;
        }

        Ok(Self {
            source: trimmed.to_string(),
            segments,
        })
    }

    /// The text the pattern was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if the pattern names exactly this path.
    pub fn matches(&self, path: &[&Segment]) -> bool {
        path.len() == self.segments.len() && self.matches_prefix_of(path)
    }

    /// True if the path lies at or below what the pattern names.
    pub fn contains(&self, path: &[&Segment]) -> bool {
        path.len() >= self.segments.len() && self.matches_prefix_of(path)
    }

    /// True if the path is a strict ancestor of what the pattern names.
    pub fn is_ancestor(&self, path: &[&Segment]) -> bool {
        path.len() < self.segments.len()
            && path
                .iter()
                .zip(&self.segments)
                .all(|(segment, pattern)| pattern.matches(segment))
    }

    fn matches_prefix_of(&self, path: &[&Segment]) -> bool {
        self.segments
            .iter()
            .zip(path)
            .all(|(pattern, segment)| pattern.matches(segment))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
