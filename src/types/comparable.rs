//! The `Comparable` capability.
//!
//! A type takes part in an equivalency comparison by projecting itself onto
//! a [`Value`]. Primitives, strings, collections, string-keyed maps, decimals
//! and chrono types are covered here; user types implement it by building an
//! [`Object`](crate::types::Object):
//!
//! ```
//! use deep_equivalency::types::{Comparable, Object, Value};
//!
//! struct Customer {
//!     name: String,
//!     orders: Vec<u32>,
//! }
//!
//! impl Comparable for Customer {
//!     fn to_value(&self) -> Value {
//!         Object::new("Customer")
//!             .with("name", &self.name)
//!             .with("orders", &self.orders)
//!             .into_value()
//!     }
//! }
//!
//! let value = Customer { name: "Ada".into(), orders: vec![1, 2] }.to_value();
//! assert_eq!(value.as_object().unwrap().member_count(), 2);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::types::{EnumValue, Object, Value};

/// Projection of a type onto the engine's value model.
pub trait Comparable {
    fn to_value(&self) -> Value;
}

impl Comparable for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: Comparable + ?Sized> Comparable for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: Comparable + ?Sized> Comparable for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// Implements `Comparable` and `From` for leaf types that map onto one variant.
macro_rules! leaf_value {
    ($variant:ident: $($ty:ty => $conv:expr),+ $(,)?) => {
        $(
            impl Comparable for $ty {
                fn to_value(&self) -> Value {
                    let convert: fn($ty) -> _ = $conv;
                    Value::$variant(convert(self.clone()))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.to_value()
                }
            }
        )+
    };
}

leaf_value!(Bool: bool => |b| b);
leaf_value!(Int: i8 => i64::from, i16 => i64::from, i32 => i64::from, i64 => |i| i);
leaf_value!(UInt: u8 => u64::from, u16 => u64::from, u32 => u64::from, u64 => |u| u);
leaf_value!(Float: f32 => f64::from, f64 => |f| f);
leaf_value!(Decimal: Decimal => |d| d);
leaf_value!(Str: String => |s| s, char => |c| c.to_string());
leaf_value!(DateTime: DateTime<FixedOffset> => |dt| dt, DateTime<Utc> => DateTime::<FixedOffset>::from);
leaf_value!(Date: NaiveDate => |d| d);
leaf_value!(Enum: EnumValue => |e| e);

impl Comparable for usize {
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl Comparable for isize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }
}

impl Comparable for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        value.to_value()
    }
}

impl<T: Comparable> Comparable for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: Comparable> Comparable for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Comparable::to_value).collect())
    }
}

impl<T: Comparable, const N: usize> Comparable for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: Comparable> Comparable for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: Comparable> Comparable for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: Comparable, S: BuildHasher> Comparable for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl Comparable for Rc<Object> {
    fn to_value(&self) -> Value {
        Value::Object(Rc::clone(self))
    }
}

impl From<Rc<Object>> for Value {
    fn from(object: Rc<Object>) -> Self {
        Value::Object(object)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        object.into_value()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_primitive_projection() {
        assert_eq!(7i32.to_value(), Value::Int(7));
        assert_eq!(7u8.to_value(), Value::UInt(7));
        assert_eq!(3usize.to_value(), Value::UInt(3));
        assert_eq!(1.5f32.to_value(), Value::Float(1.5));
        assert_eq!(true.to_value(), Value::Bool(true));
        assert_eq!("abc".to_value(), Value::str("abc"));
        assert_eq!('x'.to_value(), Value::str("x"));
    }

    #[test]
    fn test_container_projection() {
        assert_eq!(vec![1, 2].to_value(), Value::seq([1, 2]));
        assert_eq!([1u64, 2].to_value(), Value::seq([1u64, 2]));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Some(4).to_value(), Value::Int(4));

        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        assert_eq!(map.to_value(), Value::map([("a", Value::Int(1))]));
    }

    #[test]
    fn test_temporal_projection() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        match utc.to_value() {
            Value::DateTime(dt) => {
                assert_eq!(dt.offset().local_minus_utc(), 0);
                assert_eq!(dt.timestamp(), utc.timestamp());
            }
            other => panic!("unexpected value {other:?}"),
        }

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date.to_value(), Value::Date(date));
    }
}
