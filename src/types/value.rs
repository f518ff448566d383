//! Dynamic values compared by the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Object;

/// Collections longer than this are summarized in descriptions.
const DESCRIBE_LIMIT: usize = 8;

// ============================================================================
// EnumValue
// ============================================================================

/// An enumeration constant.
///
/// Enums can be compared by discriminant or by name, see
/// [`EnumHandling`](crate::engine::EnumHandling).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Name of the enumeration type (e.g. `Color`)
    pub type_name: String,
    /// Name of the variant (e.g. `Red`)
    pub name: String,
    /// Numeric value of the variant
    pub discriminant: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>, discriminant: i64) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            discriminant,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.type_name, self.name, self.discriminant)
    }
}

// ============================================================================
// ValueKind
// ============================================================================

/// The shape of a [`Value`] without its payload.
///
/// Used to key custom comparers and to describe type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Decimal,
    Str,
    DateTime,
    Date,
    Enum,
    Seq,
    Map,
    Object,
}

impl ValueKind {
    /// True for the four numeric kinds.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueKind::Int | ValueKind::UInt | ValueKind::Float | ValueKind::Decimal
        )
    }

    /// True for kinds the engine recurses into.
    #[inline]
    pub fn is_composite(self) -> bool {
        matches!(self, ValueKind::Seq | ValueKind::Map | ValueKind::Object)
    }

    /// Human-readable name with an article, for failure descriptions.
    pub fn display_name(self) -> &'static str {
        match self {
            ValueKind::Null => "<null>",
            ValueKind::Bool => "a boolean",
            ValueKind::Int => "a signed integer",
            ValueKind::UInt => "an unsigned integer",
            ValueKind::Float => "a floating-point number",
            ValueKind::Decimal => "a decimal",
            ValueKind::Str => "a string",
            ValueKind::DateTime => "a date and time",
            ValueKind::Date => "a date",
            ValueKind::Enum => "an enum",
            ValueKind::Seq => "a collection",
            ValueKind::Map => "a dictionary",
            ValueKind::Object => "an object",
        }
    }
}

// ============================================================================
// Value
// ============================================================================

/// A node of an object graph.
///
/// Leaves and collections have value semantics; [`Value::Object`] has
/// reference semantics and is the only variant that can form cycles.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Enum(EnumValue),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Rc<Object>),
}

impl Value {
    /// Build a string value.
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    /// Build a collection from anything iterable over values.
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a dictionary from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an enum constant.
    pub fn enumeration(type_name: &str, name: &str, discriminant: i64) -> Self {
        Value::Enum(EnumValue::new(type_name, name, discriminant))
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Str(_) => ValueKind::Str,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Date(_) => ValueKind::Date,
            Value::Enum(_) => ValueKind::Enum,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
            Value::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Reference identity of an object value, `None` for everything else.
    ///
    /// Two values share an identity only if they point at the same [`Object`].
    #[inline]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Short, non-recursive-through-objects description used in failures.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "<null>".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Decimal(d) => format!("{d}M"),
            Value::Str(s) => format!("{s:?}"),
            Value::DateTime(dt) => dt.to_rfc3339(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Enum(e) => e.to_string(),
            Value::Seq(items) => {
                if items.len() > DESCRIBE_LIMIT {
                    return format!("[{} items]", items.len());
                }
                let parts: Vec<String> = items.iter().map(Value::describe).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                if entries.len() > DESCRIBE_LIMIT {
                    return format!("{{{} entries}}", entries.len());
                }
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.describe()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Object(object) => format!("{} {{..}}", object.type_name()),
        }
    }
}

/// Native equality.
///
/// Structural for leaves, collections and maps. Objects are equal when they
/// are the same reference, or when both are memberless instances of the same
/// type. Never recurses through object members, so it terminates on cycles.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            // NaN equals NaN, so a graph always equals a copy of itself
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.type_name() == b.type_name()
                        && a.member_count() == 0
                        && b.member_count() == 0)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
