//! The pair of values under comparison at one node.

use std::borrow::Cow;

use crate::path::NodeId;
use crate::types::Value;

/// Subject and expectation at one node of the comparison tree.
///
/// Built fresh for every pipeline run. The subject is borrowed until the
/// conversion step replaces it with a converted copy; the expectation is
/// never rewritten.
#[derive(Debug, Clone)]
pub struct Comparands<'a> {
    subject: Cow<'a, Value>,
    expectation: &'a Value,
    node: NodeId,
}

impl<'a> Comparands<'a> {
    pub fn new(subject: &'a Value, expectation: &'a Value, node: NodeId) -> Self {
        Self {
            subject: Cow::Borrowed(subject),
            expectation,
            node,
        }
    }

    #[inline]
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    #[inline]
    pub fn expectation(&self) -> &'a Value {
        self.expectation
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// True once the subject has been replaced by a conversion.
    pub fn is_converted(&self) -> bool {
        matches!(self.subject, Cow::Owned(_))
    }

    /// Replace the subject with a converted value.
    pub(crate) fn convert_subject(&mut self, converted: Value) {
        self.subject = Cow::Owned(converted);
    }
}
