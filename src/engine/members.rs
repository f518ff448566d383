//! Member discovery and selection.
//!
//! For every complex node the engine asks which members of the expectation
//! take part in the comparison. The answer is built in three passes:
//!
//! 1. visibility: internal members are dropped unless the options include them
//! 2. path rules: `excluding(..)` and `including(..)` patterns
//! 3. custom [`MemberSelectionRule`]s, in registration order
//!
//! An object without any members is not an error (it degenerates to fallback
//! equality), but a policy that filters every existing member away is: see
//! [`EquivalencyError::NoMembersSelected`](crate::EquivalencyError::NoMembersSelected).

use crate::engine::EquivalencyOptions;
use crate::path::Segment;
use crate::types::{Object, Visibility};

/// A candidate member: its name and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub visibility: Visibility,
}

/// What a selection rule knows about the object being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberContext {
    /// Rendered path of the object, e.g. `.customer`
    pub path: String,
    pub type_name: String,
}

/// A caller-supplied filter over the members selected so far.
///
/// Closures with the matching signature are rules:
///
/// ```
/// use deep_equivalency::engine::{EquivalencyOptions, MemberContext, MemberInfo};
///
/// let options = EquivalencyOptions::builder()
///     .with_selection_rule(|ctx: &MemberContext, members: Vec<MemberInfo>| -> Vec<MemberInfo> {
///         members
///             .into_iter()
///             .filter(|m| !(ctx.type_name == "Audit" && m.name.ends_with("_at")))
///             .collect()
///     })
///     .build()
///     .unwrap();
/// # let _ = options;
/// ```
pub trait MemberSelectionRule: Send + Sync {
    fn select(&self, context: &MemberContext, members: Vec<MemberInfo>) -> Vec<MemberInfo>;
}

impl<F> MemberSelectionRule for F
where
    F: Fn(&MemberContext, Vec<MemberInfo>) -> Vec<MemberInfo> + Send + Sync,
{
    fn select(&self, context: &MemberContext, members: Vec<MemberInfo>) -> Vec<MemberInfo> {
        self(context, members)
    }
}

/// Members of `object` that take part in the comparison, in declaration order.
///
/// `parent` are the segments leading to `object`, `path` their rendering.
pub(crate) fn select_members(
    options: &EquivalencyOptions,
    object: &Object,
    parent: &[&Segment],
    path: &str,
) -> Vec<MemberInfo> {
    let include_internal = options.settings().include_internal_members;
    let mut selected: Vec<MemberInfo> = object
        .members()
        .iter()
        .filter(|m| include_internal || m.visibility == Visibility::Public)
        .filter(|m| options.is_member_selected(parent, &m.name))
        .map(|m| MemberInfo {
            name: m.name.clone(),
            visibility: m.visibility,
        })
        .collect();

    let context = MemberContext {
        path: path.to_string(),
        type_name: object.type_name().to_string(),
    };
    for rule in options.selection_rules() {
        selected = rule.select(&context, selected);
    }
    selected
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(members: &[MemberInfo]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    fn customer() -> Object {
        Object::new("Customer")
            .with("name", "Ada")
            .with("email", "ada@example.com")
            .with_internal("token", "secret")
    }

    #[test]
    fn test_default_selects_public_members() {
        let options = EquivalencyOptions::default();
        let selected = select_members(&options, &customer(), &[], "");
        assert_eq!(names(&selected), vec!["name", "email"]);
    }

    #[test]
    fn test_internal_members_can_be_included() {
        let options = EquivalencyOptions::builder()
            .including_internal_members()
            .build()
            .unwrap();
        let selected = select_members(&options, &customer(), &[], "");
        assert_eq!(names(&selected), vec!["name", "email", "token"]);
    }

    #[test]
    fn test_path_rules() {
        let options = EquivalencyOptions::builder().excluding("email").build().unwrap();
        let selected = select_members(&options, &customer(), &[], "");
        assert_eq!(names(&selected), vec!["name"]);

        // Exclusion is path-scoped: a nested customer keeps its email
        let owner = Segment::Member("owner".into());
        let selected = select_members(&options, &customer(), &[&owner], ".owner");
        assert_eq!(names(&selected), vec!["name", "email"]);

        let options = EquivalencyOptions::builder().including("email").build().unwrap();
        let selected = select_members(&options, &customer(), &[], "");
        assert_eq!(names(&selected), vec!["email"]);
    }

    #[test]
    fn test_custom_rule_sees_context() {
        let options = EquivalencyOptions::builder()
            .with_selection_rule(|ctx: &MemberContext, members: Vec<MemberInfo>| -> Vec<MemberInfo> {
                assert_eq!(ctx.type_name, "Customer");
                assert_eq!(ctx.path, ".owner");
                members.into_iter().filter(|m| m.name != "name").collect()
            })
            .build()
            .unwrap();

        let owner = Segment::Member("owner".into());
        let selected = select_members(&options, &customer(), &[&owner], ".owner");
        assert_eq!(names(&selected), vec!["email"]);
    }
}
