//! Equivalency options.
//!
//! Options come in two layers:
//!
//! - [`EquivalencySettings`]: every data-only policy knob. Plain, cheap to
//!   clone and serde-serializable, so it can live in a JSON or TOML file.
//! - [`EquivalencyOptions`]: the resolved, immutable configuration of a
//!   comparison. Built from settings plus the parts that cannot be
//!   serialized (custom comparers and member selection rules). Building
//!   validates the settings and compiles path patterns, so a bad
//!   configuration is rejected before any graph is walked.
//!
//! # Examples
//!
//! ## Default Options
//!
//! ```rust
//! use deep_equivalency::engine::{CollectionOrdering, EquivalencyOptions};
//!
//! let options = EquivalencyOptions::default();
//! assert_eq!(options.settings().ordering, CollectionOrdering::Loose);
//! assert_eq!(options.settings().max_depth, Some(10));
//! ```
//!
//! ## Builder
//!
//! ```rust
//! use deep_equivalency::engine::EquivalencyOptions;
//!
//! let options = EquivalencyOptions::builder()
//!     .with_strict_ordering()
//!     .excluding("audit")
//!     .ignoring_cyclic_references()
//!     .build()
//!     .unwrap();
//! assert!(options.settings().excluded.contains(&"audit".to_string()));
//! ```
//!
//! ## From a Settings File
//!
//! ```json
//! {
//!   "ordering": "strict",
//!   "max_depth": 20,
//!   "excluded": ["audit", "lines[*].id"],
//!   "strings": { "ignore_case": true }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::members::MemberSelectionRule;
use crate::error::EquivalencyError;
use crate::path::{PathPattern, Segment};
use crate::types::{Value, ValueKind};

/// Default limit on how deep the engine recurses.
pub const DEFAULT_MAX_DEPTH: usize = 10;

// ============================================================================
// Policy Enums
// ============================================================================

/// Whether collection items must appear in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionOrdering {
    /// Items are compared index by index
    Strict,
    /// Items are matched in any order, each subject item used once
    #[default]
    Loose,
}

/// What to do when the subject refers back to an object on the active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclicReferenceHandling {
    /// Record a cyclic-reference failure
    #[default]
    Fail,
    /// Treat the branch as proven
    Ignore,
}

/// Which subject conversions are attempted before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoConversion {
    Disabled,
    /// Lossless conversions between numeric kinds
    #[default]
    Numeric,
    /// Numeric conversions plus parsing strings into the expected kind
    Lenient,
}

/// How enum constants are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumHandling {
    #[default]
    ByValue,
    ByName,
}

/// Which side decides the members to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberMatching {
    /// Members of the expectation are compared; extra subject members are ignored
    #[default]
    ExpectationDriven,
    /// Extra subject members are failures too
    Symmetric,
}

/// String comparison relaxations. All off by default (ordinal comparison).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StringOptions {
    pub ignore_case: bool,
    pub ignore_leading_whitespace: bool,
    pub ignore_trailing_whitespace: bool,
    /// Treat `\r\n`, `\r` and `\n` as the same line break
    pub ignore_newline_style: bool,
}

// ============================================================================
// EquivalencySettings
// ============================================================================

/// Serializable policy record.
///
/// Missing fields take their default when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalencySettings {
    /// Collection ordering for every path not listed in `strict_ordering_for`
    pub ordering: CollectionOrdering,

    /// Path patterns of collections that must keep their order
    pub strict_ordering_for: Vec<String>,

    pub cyclic_references: CyclicReferenceHandling,

    /// Deepest node a recursive step may enter; `None` removes the limit
    ///
    /// With a limit of `n`, objects and collections at depth `n` are not
    /// walked into and report [`DepthExceeded`](crate::engine::FailureKind::DepthExceeded).
    pub max_depth: Option<usize>,

    pub auto_conversion: AutoConversion,

    pub enums: EnumHandling,

    pub member_matching: MemberMatching,

    /// Compare members with [`Visibility::Internal`](crate::types::Visibility::Internal)
    pub include_internal_members: bool,

    /// Skip expectation members the subject does not have instead of failing
    pub ignore_missing_members: bool,

    /// Walk into nested objects; when false only the root object is
    /// compared member-wise and nested objects use native equality
    pub recurse_nested: bool,

    /// Objects must have the same type name
    pub strict_typing: bool,

    pub strings: StringOptions,

    /// Path patterns of members left out of the comparison
    pub excluded: Vec<String>,

    /// Path patterns of the only members compared (empty = all)
    pub included: Vec<String>,
}

impl Default for EquivalencySettings {
    fn default() -> Self {
        Self {
            ordering: CollectionOrdering::Loose,
            strict_ordering_for: Vec::new(),
            cyclic_references: CyclicReferenceHandling::Fail,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            auto_conversion: AutoConversion::Numeric,
            enums: EnumHandling::ByValue,
            member_matching: MemberMatching::ExpectationDriven,
            include_internal_members: false,
            ignore_missing_members: false,
            recurse_nested: true,
            strict_typing: false,
            strings: StringOptions::default(),
            excluded: Vec::new(),
            included: Vec::new(),
        }
    }
}

impl EquivalencySettings {
    /// Check the settings without compiling them.
    ///
    /// # Errors
    ///
    /// - [`EquivalencyError::InvalidMaxDepth`] for `max_depth: Some(0)`
    /// - [`EquivalencyError::ConflictingPathRules`] when a path is both
    ///   included and excluded
    /// - [`EquivalencyError::InvalidPathPattern`] for unparsable patterns
    pub fn validate(&self) -> Result<(), EquivalencyError> {
        if self.max_depth == Some(0) {
            return Err(EquivalencyError::InvalidMaxDepth);
        }
        for pattern in self
            .excluded
            .iter()
            .chain(&self.included)
            .chain(&self.strict_ordering_for)
        {
            PathPattern::parse(pattern)?;
        }
        if let Some(conflict) = self.excluded.iter().find(|excluded| {
            self.included
                .iter()
                .any(|included| normalize(included) == normalize(excluded))
        }) {
            return Err(EquivalencyError::ConflictingPathRules {
                pattern: conflict.clone(),
            });
        }
        Ok(())
    }
}

fn normalize(pattern: &str) -> &str {
    let trimmed = pattern.trim();
    trimmed.strip_prefix('.').unwrap_or(trimmed)
}

// ============================================================================
// Custom Comparers
// ============================================================================

type ComparerFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;
type ValuePredicate = dyn Fn(&Value) -> bool + Send + Sync;

/// Decides which expectations a custom comparer applies to.
#[derive(Clone)]
pub enum TypeMatcher {
    /// Objects with this type name
    TypeName(String),
    /// Any value of this kind
    Kind(ValueKind),
    /// Any expectation the predicate accepts
    Predicate(Arc<ValuePredicate>),
}

impl TypeMatcher {
    pub fn applies_to(&self, expectation: &Value) -> bool {
        match self {
            TypeMatcher::TypeName(name) => expectation
                .as_object()
                .is_some_and(|object| object.type_name() == name),
            TypeMatcher::Kind(kind) => expectation.kind() == *kind,
            TypeMatcher::Predicate(predicate) => predicate(expectation),
        }
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatcher::TypeName(name) => f.debug_tuple("TypeName").field(name).finish(),
            TypeMatcher::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            TypeMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A caller-supplied comparison that replaces the built-in steps for the
/// expectations its matcher accepts. Called as `compare(subject, expectation)`.
#[derive(Clone)]
pub struct CustomComparer {
    matcher: TypeMatcher,
    compare: Arc<ComparerFn>,
}

impl CustomComparer {
    pub fn new<F>(matcher: TypeMatcher, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            matcher,
            compare: Arc::new(compare),
        }
    }

    pub fn matcher(&self) -> &TypeMatcher {
        &self.matcher
    }

    #[inline]
    pub fn applies_to(&self, expectation: &Value) -> bool {
        self.matcher.applies_to(expectation)
    }

    #[inline]
    pub fn compare(&self, subject: &Value, expectation: &Value) -> bool {
        (self.compare)(subject, expectation)
    }
}

impl fmt::Debug for CustomComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomComparer")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EquivalencyOptions
// ============================================================================

/// Resolved, immutable configuration of a comparison.
///
/// Cheap to clone (comparers and rules are shared) and `Send + Sync`, so one
/// instance can serve comparisons on many threads; each comparison still
/// builds its own walk state.
#[derive(Clone, Default)]
pub struct EquivalencyOptions {
    settings: EquivalencySettings,
    excluded: Vec<PathPattern>,
    included: Vec<PathPattern>,
    strict_ordering_for: Vec<PathPattern>,
    comparers: Vec<CustomComparer>,
    selection_rules: Vec<Arc<dyn MemberSelectionRule>>,
}

impl EquivalencyOptions {
    pub fn builder() -> EquivalencyOptionsBuilder {
        EquivalencyOptionsBuilder::default()
    }

    /// Resolve options from a settings record.
    pub fn from_settings(settings: EquivalencySettings) -> Result<Self, EquivalencyError> {
        EquivalencyOptionsBuilder::from_settings(settings).build()
    }

    pub fn settings(&self) -> &EquivalencySettings {
        &self.settings
    }

    pub fn comparers(&self) -> &[CustomComparer] {
        &self.comparers
    }

    pub(crate) fn selection_rules(&self) -> impl Iterator<Item = &dyn MemberSelectionRule> {
        self.selection_rules.iter().map(|rule| rule.as_ref())
    }

    /// First registered comparer that applies to this expectation.
    pub(crate) fn comparer_for(&self, expectation: &Value) -> Option<&CustomComparer> {
        self.comparers.iter().find(|c| c.applies_to(expectation))
    }

    /// Whether the collection at `path` must keep its order.
    pub(crate) fn is_strict_ordering(&self, path: &[&Segment]) -> bool {
        self.settings.ordering == CollectionOrdering::Strict
            || self.strict_ordering_for.iter().any(|p| p.matches(path))
    }

    /// Whether member `name` of the object at `parent` passes the path rules.
    pub(crate) fn is_member_selected(&self, parent: &[&Segment], name: &str) -> bool {
        let segment = Segment::Member(name.to_string());
        let mut path = Vec::with_capacity(parent.len() + 1);
        path.extend_from_slice(parent);
        path.push(&segment);

        if self.excluded.iter().any(|p| p.matches(&path)) {
            return false;
        }
        self.included.is_empty()
            || self
                .included
                .iter()
                .any(|p| p.contains(&path) || p.is_ancestor(&path))
    }
}

impl fmt::Debug for EquivalencyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquivalencyOptions")
            .field("settings", &self.settings)
            .field("comparers", &self.comparers)
            .field("selection_rules", &self.selection_rules.len())
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`EquivalencyOptions`].
#[derive(Default)]
pub struct EquivalencyOptionsBuilder {
    settings: EquivalencySettings,
    comparers: Vec<CustomComparer>,
    selection_rules: Vec<Arc<dyn MemberSelectionRule>>,
}

impl EquivalencyOptionsBuilder {
    /// Start from an existing settings record.
    pub fn from_settings(settings: EquivalencySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_strict_ordering(mut self) -> Self {
        self.settings.ordering = CollectionOrdering::Strict;
        self
    }

    pub fn without_strict_ordering(mut self) -> Self {
        self.settings.ordering = CollectionOrdering::Loose;
        self
    }

    /// Require order only for collections matching `pattern`.
    pub fn with_strict_ordering_for(mut self, pattern: impl Into<String>) -> Self {
        self.settings.strict_ordering_for.push(pattern.into());
        self
    }

    pub fn ignoring_cyclic_references(mut self) -> Self {
        self.settings.cyclic_references = CyclicReferenceHandling::Ignore;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.settings.max_depth = Some(depth);
        self
    }

    pub fn allowing_infinite_recursion(mut self) -> Self {
        self.settings.max_depth = None;
        self
    }

    pub fn auto_conversion(mut self, conversion: AutoConversion) -> Self {
        self.settings.auto_conversion = conversion;
        self
    }

    pub fn without_auto_conversion(self) -> Self {
        self.auto_conversion(AutoConversion::Disabled)
    }

    pub fn comparing_enums_by_name(mut self) -> Self {
        self.settings.enums = EnumHandling::ByName;
        self
    }

    pub fn comparing_enums_by_value(mut self) -> Self {
        self.settings.enums = EnumHandling::ByValue;
        self
    }

    pub fn with_symmetric_members(mut self) -> Self {
        self.settings.member_matching = MemberMatching::Symmetric;
        self
    }

    pub fn including_internal_members(mut self) -> Self {
        self.settings.include_internal_members = true;
        self
    }

    pub fn ignoring_missing_members(mut self) -> Self {
        self.settings.ignore_missing_members = true;
        self
    }

    pub fn excluding_nested_objects(mut self) -> Self {
        self.settings.recurse_nested = false;
        self
    }

    pub fn respecting_types(mut self) -> Self {
        self.settings.strict_typing = true;
        self
    }

    pub fn ignoring_case(mut self) -> Self {
        self.settings.strings.ignore_case = true;
        self
    }

    pub fn ignoring_leading_whitespace(mut self) -> Self {
        self.settings.strings.ignore_leading_whitespace = true;
        self
    }

    pub fn ignoring_trailing_whitespace(mut self) -> Self {
        self.settings.strings.ignore_trailing_whitespace = true;
        self
    }

    pub fn ignoring_newline_style(mut self) -> Self {
        self.settings.strings.ignore_newline_style = true;
        self
    }

    /// Leave members matching `pattern` out of the comparison.
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.settings.excluded.push(pattern.into());
        self
    }

    /// Compare only members matching `pattern` (and the path leading to them).
    pub fn including(mut self, pattern: impl Into<String>) -> Self {
        self.settings.included.push(pattern.into());
        self
    }

    /// Compare objects of type `type_name` with `compare(subject, expectation)`.
    pub fn using<F>(self, type_name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.using_comparer(CustomComparer::new(TypeMatcher::TypeName(type_name.into()), compare))
    }

    /// Compare every expectation of `kind` with `compare(subject, expectation)`.
    pub fn using_for_kind<F>(self, kind: ValueKind, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.using_comparer(CustomComparer::new(TypeMatcher::Kind(kind), compare))
    }

    /// Compare expectations accepted by `when` with `compare(subject, expectation)`.
    pub fn using_when<P, F>(self, when: P, compare: F) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.using_comparer(CustomComparer::new(TypeMatcher::Predicate(Arc::new(when)), compare))
    }

    pub fn using_comparer(mut self, comparer: CustomComparer) -> Self {
        self.comparers.push(comparer);
        self
    }

    pub fn with_selection_rule<R>(mut self, rule: R) -> Self
    where
        R: MemberSelectionRule + 'static,
    {
        self.selection_rules.push(Arc::new(rule));
        self
    }

    /// Validate and resolve.
    pub fn build(self) -> Result<EquivalencyOptions, EquivalencyError> {
        self.settings.validate()?;
        let compile = |patterns: &[String]| -> Result<Vec<PathPattern>, EquivalencyError> {
            patterns.iter().map(|p| PathPattern::parse(p)).collect()
        };

        Ok(EquivalencyOptions {
            excluded: compile(&self.settings.excluded)?,
            included: compile(&self.settings.included)?,
            strict_ordering_for: compile(&self.settings.strict_ordering_for)?,
            settings: self.settings,
            comparers: self.comparers,
            selection_rules: self.selection_rules,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Object;

    #[test]
    fn test_defaults() {
        let settings = EquivalencySettings::default();
        assert_eq!(settings.ordering, CollectionOrdering::Loose);
        assert_eq!(settings.cyclic_references, CyclicReferenceHandling::Fail);
        assert_eq!(settings.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(settings.auto_conversion, AutoConversion::Numeric);
        assert_eq!(settings.member_matching, MemberMatching::ExpectationDriven);
        assert!(settings.recurse_nested);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let result = EquivalencyOptions::builder().max_depth(0).build();
        assert_eq!(result.unwrap_err(), EquivalencyError::InvalidMaxDepth);

        let result = EquivalencyOptions::builder()
            .excluding("total")
            .including(".total")
            .build();
        assert!(matches!(
            result,
            Err(EquivalencyError::ConflictingPathRules { .. })
        ));

        let result = EquivalencyOptions::builder().excluding("lines[").build();
        assert!(matches!(
            result,
            Err(EquivalencyError::InvalidPathPattern { .. })
        ));
    }

    #[test]
    fn test_strict_ordering_per_path() {
        let options = EquivalencyOptions::builder()
            .with_strict_ordering_for("lines")
            .build()
            .unwrap();
        let lines = Segment::Member("lines".into());
        let tags = Segment::Member("tags".into());
        assert!(options.is_strict_ordering(&[&lines]));
        assert!(!options.is_strict_ordering(&[&tags]));
        assert!(!options.is_strict_ordering(&[]));

        let options = EquivalencyOptions::builder().with_strict_ordering().build().unwrap();
        assert!(options.is_strict_ordering(&[]));
    }

    #[test]
    fn test_included_paths_keep_ancestors() {
        let options = EquivalencyOptions::builder()
            .including("customer.address.city")
            .build()
            .unwrap();
        let customer = Segment::Member("customer".into());
        let address = Segment::Member("address".into());

        assert!(options.is_member_selected(&[], "customer"));
        assert!(!options.is_member_selected(&[], "total"));
        assert!(options.is_member_selected(&[&customer], "address"));
        assert!(!options.is_member_selected(&[&customer], "name"));
        assert!(options.is_member_selected(&[&customer, &address], "city"));
    }

    #[test]
    fn test_comparer_lookup() {
        let options = EquivalencyOptions::builder()
            .using("Money", |_, _| true)
            .using_for_kind(ValueKind::Float, |s, e| s.kind() == e.kind())
            .build()
            .unwrap();

        let money = Object::new("Money").with("amount", 1).into_value();
        let other = Object::new("Price").with("amount", 1).into_value();
        assert!(options.comparer_for(&money).is_some());
        assert!(options.comparer_for(&other).is_none());
        assert!(options.comparer_for(&Value::Float(1.0)).is_some());
        assert!(options.comparer_for(&Value::Int(1)).is_none());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{
            "ordering": "strict",
            "max_depth": null,
            "excluded": ["audit"],
            "strings": { "ignore_case": true }
        }"#;
        let settings: EquivalencySettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.ordering, CollectionOrdering::Strict);
        assert_eq!(settings.max_depth, None);
        assert!(settings.strings.ignore_case);
        assert!(!settings.strings.ignore_leading_whitespace);
        assert_eq!(settings.enums, EnumHandling::ByValue);

        let options = EquivalencyOptions::from_settings(settings.clone()).unwrap();
        assert_eq!(options.settings(), &settings);
    }
}
