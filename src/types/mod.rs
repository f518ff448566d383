//! Value model for the equivalency engine.
//!
//! ## Types
//!
//! - [`Value`]: a node of a dynamic object graph (leaf, collection, map or object)
//! - [`Object`]: a named bag of members with reference identity
//! - [`Member`]: one named member of an object, with its [`Visibility`]
//! - [`EnumValue`]: an enumeration constant (type, name, discriminant)
//! - [`Comparable`]: the capability a type opts into to be compared
//!
//! ## Identity
//!
//! Only objects have reference identity. They are shared through `Rc` and keep
//! their members behind a `RefCell`, so a child can point back at its parent
//! after both have been created:
//!
//! ```
//! use deep_equivalency::types::{Object, Value};
//!
//! let node = Object::new("Node").with("value", 1).into_ref();
//! node.set("next", Value::Object(node.clone()));
//!
//! assert_eq!(node.member("next").and_then(|v| v.identity()), Some(Value::Object(node.clone()).identity().unwrap()));
//! # node.clear();
//! ```

mod comparable;
pub mod numeric;
mod object;
mod value;

pub use comparable::Comparable;
pub use object::{Member, Object, Visibility};
pub use value::{EnumValue, Value, ValueKind};
