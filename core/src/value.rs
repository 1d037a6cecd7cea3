//! Value helpers - classification, equality and text form for candidates
//!
//! Candidates are plain [`serde_json::Value`]s. The engine never inspects a
//! value's representation directly; it goes through the helpers here so the
//! type-class rules live in one place.
//!
//! # Numeric coercion
//!
//! Integers and floats share one [`Kind`]. Two numbers are equal when they
//! denote the same quantity, so `2` equals `2.0`.

use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;

/// The type class of a value: what the structural check compares.
///
/// # Example
///
/// ```
/// use exemplar::Kind;
/// use serde_json::json;
///
/// assert_eq!(Kind::of(&json!(2)), Kind::of(&json!(2.5)));
/// assert_eq!(Kind::of(&json!([1])), Kind::Sequence);
/// assert_ne!(Kind::of(&json!("2")), Kind::Number);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool,
    /// Any integer or float.
    Number,
    /// A string.
    String,
    /// An ordered sequence.
    Sequence,
    /// A key-value mapping.
    Mapping,
}

impl Kind {
    /// Classify a value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }

    /// Returns the human-readable name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deep equality with integer/float coercion.
///
/// Mappings compare as key sets (order-insensitive), sequences in order.
///
/// ```
/// use exemplar::values_equal;
/// use serde_json::json;
///
/// assert!(values_equal(&json!({ "lat": 2.0 }), &json!({ "lat": 2 })));
/// assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
/// ```
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)] // exact numeric equality is the contract
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if !(a.is_f64() || b.is_f64()) {
        // one negative i64, one u64 above i64::MAX
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// The textual form a `matches` pattern is tested against.
///
/// Strings are used as-is (no quotes), numbers and booleans use their
/// canonical spelling, containers their compact JSON.
///
/// ```
/// use exemplar::text_of;
/// use serde_json::json;
///
/// assert_eq!(text_of(&json!("SXF")), "SXF");
/// assert_eq!(text_of(&json!(42)), "42");
/// assert_eq!(text_of(&json!(true)), "true");
/// ```
#[must_use]
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}
