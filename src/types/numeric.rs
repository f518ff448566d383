//! Lossless conversions between value kinds.
//!
//! ## Overview
//!
//! The conversion step tries to bring a subject onto the expectation's kind
//! before comparing them. A conversion is only accepted when it loses
//! nothing: every numeric value is first lifted into an exact
//! [`Decimal`], and the result must map back onto the target kind without
//! rounding.
//!
//! ## Floats
//!
//! A float enters the decimal domain through its shortest round-trip
//! representation (`0.1f64` becomes `0.1`, not the full binary expansion).
//! Going the other way, a decimal becomes a float only if printing that float
//! yields the same decimal again.
//!
//! ## Examples
//!
//! ```
//! use deep_equivalency::types::{Value, ValueKind};
//! use deep_equivalency::types::numeric::convert_numeric;
//!
//! assert_eq!(convert_numeric(&Value::Int(3), ValueKind::Float), Some(Value::Float(3.0)));
//! assert_eq!(convert_numeric(&Value::Float(2.5), ValueKind::Int), None);
//! assert_eq!(convert_numeric(&Value::Int(-1), ValueKind::UInt), None);
//! ```

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::types::{Value, ValueKind};

// ============================================================================
// Decimal Bridge
// ============================================================================

/// Exact decimal representation of a numeric value.
///
/// Returns `None` for non-numeric values, non-finite floats, and floats
/// outside the range `Decimal` can hold.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::UInt(u) => Some(Decimal::from(*u)),
        Value::Decimal(d) => Some(*d),
        Value::Float(f) => float_to_decimal(*f),
        _ => None,
    }
}

/// Shortest round-trip decimal for a float.
pub fn float_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_str(&f.to_string()).ok()
}

/// Express a decimal as `target` without losing information.
pub fn from_decimal(d: Decimal, target: ValueKind) -> Option<Value> {
    match target {
        ValueKind::Int => {
            if !d.fract().is_zero() {
                return None;
            }
            d.to_i64().map(Value::Int)
        }
        ValueKind::UInt => {
            if !d.fract().is_zero() || (d.is_sign_negative() && !d.is_zero()) {
                return None;
            }
            d.to_u64().map(Value::UInt)
        }
        ValueKind::Float => {
            let f = d.to_f64()?;
            // Accept only if the float prints back to the same decimal
            (float_to_decimal(f)? == d).then_some(Value::Float(f))
        }
        ValueKind::Decimal => Some(Value::Decimal(d)),
        _ => None,
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a numeric value to another numeric kind, losslessly.
///
/// # Returns
///
/// * `Some(Value)` - The converted value
/// * `None` - If either side is not numeric or the conversion would lose precision
pub fn convert_numeric(value: &Value, target: ValueKind) -> Option<Value> {
    if !value.kind().is_numeric() || !target.is_numeric() {
        return None;
    }
    if value.kind() == target {
        return Some(value.clone());
    }
    to_decimal(value).and_then(|d| from_decimal(d, target))
}

/// Parse text as a value of `target` kind.
///
/// Surrounding whitespace is ignored. Used by lenient auto-conversion only.
///
/// # Example
///
/// ```
/// use deep_equivalency::types::{Value, ValueKind};
/// use deep_equivalency::types::numeric::parse_as;
///
/// assert_eq!(parse_as(" 42 ", ValueKind::Int), Some(Value::Int(42)));
/// assert_eq!(parse_as("true", ValueKind::Bool), Some(Value::Bool(true)));
/// assert_eq!(parse_as("4.2", ValueKind::Int), None);
/// ```
pub fn parse_as(text: &str, target: ValueKind) -> Option<Value> {
    let text = text.trim();
    match target {
        ValueKind::Bool => text.parse().ok().map(Value::Bool),
        ValueKind::Int => text.parse().ok().map(Value::Int),
        ValueKind::UInt => text.parse().ok().map(Value::UInt),
        ValueKind::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        ValueKind::Decimal => Decimal::from_str(text).ok().map(Value::Decimal),
        ValueKind::DateTime => DateTime::parse_from_rfc3339(text).ok().map(Value::DateTime),
        ValueKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        _ => None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
