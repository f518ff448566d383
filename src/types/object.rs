//! Objects: named members behind a shared reference.
//!
//! ## Design
//!
//! An [`Object`] is always handled through `Rc<Object>` once it is part of a
//! graph. Its members live in a `RefCell` so that back-edges (a child pointing
//! at its parent, a node pointing at itself) can be wired after the `Rc`
//! exists. Member order is insertion order and is the order members are
//! compared in.
//!
//! Graphs with cycles keep themselves alive; call [`Object::clear`] on one
//! object of the cycle to release them.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::types::{Comparable, Value};

/// Visibility of a member.
///
/// Internal members are skipped unless the options include them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// One named member of an object.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
}

impl Member {
    pub fn new(name: impl Into<String>, value: Value, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            value,
            visibility,
        }
    }
}

/// A complex value compared member by member.
pub struct Object {
    type_name: String,
    members: RefCell<Vec<Member>>,
}

impl Object {
    /// Create an object without members.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: RefCell::new(Vec::new()),
        }
    }

    /// Add (or replace) a public member, builder style.
    pub fn with(self, name: impl Into<String>, value: impl Comparable) -> Self {
        self.put(name.into(), value.to_value(), Some(Visibility::Public));
        self
    }

    /// Add (or replace) an internal member, builder style.
    pub fn with_internal(self, name: impl Into<String>, value: impl Comparable) -> Self {
        self.put(name.into(), value.to_value(), Some(Visibility::Internal));
        self
    }

    /// Wrap in an `Rc` so the object can be shared or referenced from its own members.
    pub fn into_ref(self) -> Rc<Object> {
        Rc::new(self)
    }

    pub fn into_value(self) -> Value {
        Value::Object(Rc::new(self))
    }

    /// Set a member through a shared reference.
    ///
    /// An existing member keeps its visibility; a new one is public.
    ///
    /// # Panics
    ///
    /// Panics if the object's members are currently borrowed, i.e. when
    /// called from inside a comparison of this object.
    pub fn set(&self, name: impl Into<String>, value: impl Comparable) {
        self.put(name.into(), value.to_value(), None);
    }

    fn put(&self, name: String, value: Value, visibility: Option<Visibility>) {
        let mut members = self.members.borrow_mut();
        match members.iter_mut().find(|m| m.name == name) {
            Some(existing) => {
                existing.value = value;
                if let Some(visibility) = visibility {
                    existing.visibility = visibility;
                }
            }
            None => members.push(Member::new(name, value, visibility.unwrap_or_default())),
        }
    }

    /// Drop every member. Breaks reference cycles running through this object.
    pub fn clear(&self) {
        self.members.borrow_mut().clear();
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.borrow().len()
    }

    /// Borrow all members in declaration order.
    pub fn members(&self) -> Ref<'_, [Member]> {
        Ref::map(self.members.borrow(), |members| members.as_slice())
    }

    /// Clone the value of a member by name.
    pub fn member(&self, name: &str) -> Option<Value> {
        self.members
            .borrow()
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value.clone())
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.borrow().iter().any(|m| m.name == name)
    }
}

// Members are listed by name only: a full dump would not terminate on cycles.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.borrow();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .field("members", &names)
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
